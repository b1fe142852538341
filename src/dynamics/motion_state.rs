use crate::math::{Isometry, Real};
use downcast_rs::{impl_downcast, DowncastSync};

/// Synchronization point between a rigid body and an external transform, typically the one
/// of a rendered object.
///
/// The transforms exchanged here are the ones of the body's center of mass.
pub trait MotionState: DowncastSync + core::fmt::Debug {
    /// The current center-of-mass transform, read when the body is created and before each
    /// step for kinematic bodies.
    fn world_transform(&self) -> Isometry<Real>;

    /// Sets the new center-of-mass transform computed by the simulation.
    fn set_world_transform(&mut self, center_of_mass_transform: &Isometry<Real>);
}

impl_downcast!(sync MotionState);

/// A motion state storing the graphics transform, offset from the center of mass.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DefaultMotionState {
    /// The transform of the graphics object.
    pub graphics_world_transform: Isometry<Real>,
    /// The transform of the center of mass relative to the graphics object.
    pub center_of_mass_offset: Isometry<Real>,
    /// The graphics transform given at creation.
    pub start_world_transform: Isometry<Real>,
}

impl Default for DefaultMotionState {
    fn default() -> Self {
        Self::new(Isometry::identity())
    }
}

impl DefaultMotionState {
    /// A motion state starting at `start` with no center of mass offset.
    pub fn new(start: Isometry<Real>) -> Self {
        Self::with_center_of_mass_offset(start, Isometry::identity())
    }

    /// A motion state starting at `start` with the given center of mass offset.
    pub fn with_center_of_mass_offset(
        start: Isometry<Real>,
        center_of_mass_offset: Isometry<Real>,
    ) -> Self {
        Self {
            graphics_world_transform: start,
            center_of_mass_offset,
            start_world_transform: start,
        }
    }
}

impl MotionState for DefaultMotionState {
    fn world_transform(&self) -> Isometry<Real> {
        self.center_of_mass_offset.inverse() * self.graphics_world_transform
    }

    fn set_world_transform(&mut self, center_of_mass_transform: &Isometry<Real>) {
        self.graphics_world_transform = center_of_mass_transform * self.center_of_mass_offset;
    }
}
