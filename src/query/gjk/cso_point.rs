use crate::math::{Point, Real, Vector};
use core::ops::Sub;

/// A point of a Configuration-Space Obstacle.
///
/// A Configuration-Space Obstacle (CSO) is the result of the
/// Minkowski Difference of two solids. In other words, each of its
/// points correspond to the difference of two point, each belonging
/// to a different solid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CSOPoint {
    /// The point on the CSO. This is equal to `self.orig1 - self.orig2`, unless this CSOPoint
    /// has been translated with self.translate.
    pub point: Point<Real>,
    /// The original point on the first shape used to compute `self.point`.
    pub orig1: Point<Real>,
    /// The original point on the second shape used to compute `self.point`.
    pub orig2: Point<Real>,
}

impl Default for CSOPoint {
    fn default() -> Self {
        Self::origin()
    }
}

impl CSOPoint {
    /// Initializes a CSO point with `orig1 - orig2`.
    pub fn new(orig1: Point<Real>, orig2: Point<Real>) -> Self {
        let point = Point::from(orig1 - orig2);
        Self::new_with_point(point, orig1, orig2)
    }

    /// Initializes a CSO point with all information provided.
    ///
    /// It is assumed, but not checked, that `point == orig1 - orig2`.
    pub fn new_with_point(point: Point<Real>, orig1: Point<Real>, orig2: Point<Real>) -> Self {
        CSOPoint {
            point,
            orig1,
            orig2,
        }
    }

    /// CSO point where all components are set to zero.
    pub fn origin() -> Self {
        CSOPoint::new(Point::origin(), Point::origin())
    }

    /// Translate the CSO point.
    pub fn translate(&self, dir: &Vector<Real>) -> Self {
        CSOPoint::new_with_point(self.point + dir, self.orig1, self.orig2)
    }
}

impl Sub<CSOPoint> for CSOPoint {
    type Output = Vector<Real>;

    #[inline]
    fn sub(self, rhs: CSOPoint) -> Vector<Real> {
        self.point - rhs.point
    }
}
