//! Definition of the triangle shape.

use crate::math::{Point, Real, Vector};
use crate::shape::{Shape, ShapeType, SupportMap};

/// A triangle shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The normal of this triangle assuming it is oriented ccw.
    ///
    /// The normal points such that it is collinear to `AB × AC` (where `×` denotes the cross
    /// product). Returns `None` for a degenerate triangle.
    #[inline]
    pub fn normal(&self) -> Option<na::Unit<Vector<Real>>> {
        na::Unit::try_new(self.scaled_normal(), Real::EPSILON)
    }

    /// A vector normal of this triangle, with a magnitude equal to twice its area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }
}

impl SupportMap for Triangle {
    #[inline]
    fn local_support_point_without_margin(&self, dir: &Vector<Real>) -> Point<Real> {
        let d1 = self.a.coords.dot(dir);
        let d2 = self.b.coords.dot(dir);
        let d3 = self.c.coords.dot(dir);

        if d1 > d2 {
            if d1 > d3 {
                self.a
            } else {
                self.c
            }
        } else if d2 > d3 {
            self.b
        } else {
            self.c
        }
    }
}

impl Shape for Triangle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Triangle
    }

    fn as_support_map(&self) -> &dyn SupportMap {
        self
    }

    // Triangles are only meant to be static geometry.
    fn compute_local_inertia(&self, _mass: Real) -> Vector<Real> {
        Vector::zeros()
    }
}

#[cfg(test)]
mod test {
    use super::Triangle;
    use crate::math::{Point, Vector};
    use crate::shape::SupportMap;

    #[test]
    fn support_picks_extreme_vertex() {
        let tri = Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        );
        assert_eq!(tri.local_support_point(&Vector::x()), tri.b);
        assert_eq!(tri.local_support_point(&Vector::y()), tri.c);
        assert_eq!(tri.local_support_point(&-Vector::x()), tri.c);
        assert_relative_eq!(tri.normal().unwrap().into_inner(), Vector::z());
    }
}
