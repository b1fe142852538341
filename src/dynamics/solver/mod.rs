//! Constraint solvers resolving contacts and joints into velocity changes.

pub use self::sequential_impulse::SequentialImpulseConstraintSolver;

use crate::dynamics::{IntegrationParameters, RigidBodySet, TypedConstraint};
use crate::math::Real;
use crate::query::PersistentManifold;

mod sequential_impulse;

/// A solver for the contacts and joints of a group of bodies.
pub trait ConstraintSolver {
    /// Called once per step, before any group is solved.
    fn prepare_solve(&mut self, _num_bodies: usize, _num_manifolds: usize) {}

    /// Solves the contacts of `manifolds` and the `constraints` of one island, or of the whole
    /// world if islands are not split.
    ///
    /// Returns the residual of the last iteration.
    fn solve_group(
        &mut self,
        bodies: &mut RigidBodySet,
        manifolds: &mut [&mut PersistentManifold],
        constraints: &mut [&mut dyn TypedConstraint],
        params: &IntegrationParameters,
        dt: Real,
    ) -> Real;

    /// Called once per step, after all the groups were solved.
    fn all_solved(&mut self) {}

    /// Clears any state carried from one step to the next.
    fn reset(&mut self);
}
