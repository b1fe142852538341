use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::SupportMap;

/// The outcome of a successful convex cast.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CastResult {
    /// The fraction of the motion, in `[0, 1]`, at which the shapes first touch.
    pub fraction: Real,
    /// The world-space unit contact normal at impact, pointing from the second shape toward
    /// the first one. May be zero for the GJK cast if the shapes started in contact.
    pub normal: Vector<Real>,
    /// The world-space contact point at impact, on the second shape.
    pub hit_point: Point<Real>,
}

/// A time-of-impact algorithm for two convex shapes undergoing translational motions.
///
/// Only the translation of the start and end transforms is interpolated: both shapes keep
/// their start orientation for the whole cast.
pub trait ConvexCast {
    /// Computes the first time `shape_a` moving from `from_a` to `to_a` touches `shape_b`
    /// moving from `from_b` to `to_b`.
    ///
    /// Returns `None` if the shapes don't touch during the motion, if they are moving apart
    /// at the contact, or if the algorithm did not converge.
    fn time_of_impact(
        &mut self,
        shape_a: &dyn SupportMap,
        from_a: &Isometry<Real>,
        to_a: &Isometry<Real>,
        shape_b: &dyn SupportMap,
        from_b: &Isometry<Real>,
        to_b: &Isometry<Real>,
    ) -> Option<CastResult>;
}
