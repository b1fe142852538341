use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A support mapping that is the point at (0.0, 0.0, 0.0).
///
/// This is the zero-radius sphere used to cast rays as a convex cast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantOrigin;

impl SupportMap for ConstantOrigin {
    #[inline]
    fn local_support_point_without_margin(&self, _: &Vector<Real>) -> Point<Real> {
        Point::origin()
    }
}
