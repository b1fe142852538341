use crate::dynamics::{RigidBodyHandle, RigidBodySet};
use crate::math::Real;
use downcast_rs::{impl_downcast, DowncastSync};

/// The identifier of a constraint inserted into a dynamics world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConstraintHandle(pub(crate) usize);

/// A joint between a rigid body and either another body or the world.
pub trait TypedConstraint: DowncastSync {
    /// The first body attached by this constraint.
    fn body_a(&self) -> RigidBodyHandle;

    /// The second body attached by this constraint, or `None` if it is attached to the world.
    fn body_b(&self) -> Option<RigidBodyHandle>;

    /// Prepares the solver data at the beginning of a solve.
    fn build_jacobian(&mut self, bodies: &RigidBodySet);

    /// Applies the impulses of one solver iteration.
    fn solve_constraint(&mut self, bodies: &mut RigidBodySet, dt: Real);

    /// The total impulse applied since the last call to [`Self::build_jacobian`].
    fn applied_impulse(&self) -> Real;
}

impl_downcast!(sync TypedConstraint);

/// The island solving the constraint, given the island tags of its bodies.
pub(crate) fn constraint_island_id(
    constraint: &dyn TypedConstraint,
    bodies: &RigidBodySet,
) -> Option<usize> {
    let tag = |h: RigidBodyHandle| bodies.get(h).and_then(|b| b.island_tag());
    tag(constraint.body_a()).or_else(|| constraint.body_b().and_then(tag))
}
