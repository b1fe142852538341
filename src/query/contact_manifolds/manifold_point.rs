use crate::math::{Point, Real, Vector};

/// An opaque value attached to a contact point by the embedding application.
///
/// The physics core only carries it from frame to frame and hands it back through the
/// contact-destroyed callback when the point leaves its manifold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ContactUserHandle(pub u64);

/// A single cached contact point between two bodies.
///
/// The local points are the persistent part of the contact: the world-space positions and the
/// distance are recomputed from them every time the manifold is refreshed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ManifoldPoint {
    /// The contact point in the local-space of the first body.
    pub local_point_a: Point<Real>,
    /// The contact point in the local-space of the second body.
    pub local_point_b: Point<Real>,
    /// The world-space position of the contact on the first body.
    pub position_world_on_a: Point<Real>,
    /// The world-space position of the contact on the second body.
    pub position_world_on_b: Point<Real>,
    /// The world-space contact normal, pointing from the second body toward the first one.
    pub normal_world_on_b: Vector<Real>,
    /// The signed distance between both bodies along the normal. Negative if penetrating.
    pub distance: Real,
    /// The friction coefficient of this contact.
    pub combined_friction: Real,
    /// The restitution coefficient of this contact.
    pub combined_restitution: Real,
    /// Data attached to this contact by the embedding application.
    pub user_handle: Option<ContactUserHandle>,
    /// The number of refreshes this point survived.
    pub lifetime: u32,
    /// The normal impulse applied at this point during the last solve.
    pub applied_impulse: Real,
    /// The friction impulse applied along `lateral_friction_dir1` during the last solve.
    pub applied_impulse_lateral1: Real,
    /// The friction impulse applied along `lateral_friction_dir2` during the last solve.
    pub applied_impulse_lateral2: Real,
    /// The first friction direction.
    pub lateral_friction_dir1: Vector<Real>,
    /// The second friction direction.
    pub lateral_friction_dir2: Vector<Real>,
}

impl Default for ManifoldPoint {
    fn default() -> Self {
        Self::new(
            Point::origin(),
            Point::origin(),
            Vector::zeros(),
            0.0,
        )
    }
}

impl ManifoldPoint {
    /// Creates a new contact point from its local positions, world normal, and distance.
    pub fn new(
        local_point_a: Point<Real>,
        local_point_b: Point<Real>,
        normal_world_on_b: Vector<Real>,
        distance: Real,
    ) -> Self {
        Self {
            local_point_a,
            local_point_b,
            position_world_on_a: Point::origin(),
            position_world_on_b: Point::origin(),
            normal_world_on_b,
            distance,
            combined_friction: 0.0,
            combined_restitution: 0.0,
            user_handle: None,
            lifetime: 0,
            applied_impulse: 0.0,
            applied_impulse_lateral1: 0.0,
            applied_impulse_lateral2: 0.0,
            lateral_friction_dir1: Vector::zeros(),
            lateral_friction_dir2: Vector::zeros(),
        }
    }

    /// The world-space position of the contact on the first body.
    #[inline]
    pub fn position_world_on_a(&self) -> Point<Real> {
        self.position_world_on_a
    }

    /// The world-space position of the contact on the second body.
    #[inline]
    pub fn position_world_on_b(&self) -> Point<Real> {
        self.position_world_on_b
    }
}
