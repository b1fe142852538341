use crate::math::{Point, Real, Vector};
use crate::shape::{Shape, ShapeType, SupportMap};

/// A Ball shape.
///
/// Its core is a single point and its radius is entirely carried by the margin.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Ball {
        Ball { radius }
    }
}

impl SupportMap for Ball {
    #[inline]
    fn local_support_point_without_margin(&self, _: &Vector<Real>) -> Point<Real> {
        Point::origin()
    }

    #[inline]
    fn margin(&self) -> Real {
        self.radius
    }
}

impl Shape for Ball {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Ball
    }

    fn as_support_map(&self) -> &dyn SupportMap {
        self
    }

    fn compute_local_inertia(&self, mass: Real) -> Vector<Real> {
        Vector::repeat(0.4 * mass * self.radius * self.radius)
    }
}

#[cfg(test)]
mod test {
    use super::Ball;
    use crate::math::{Point, Vector};
    use crate::shape::SupportMap;

    #[test]
    fn support_includes_radius() {
        let ball = Ball::new(2.0);
        let pt = ball.local_support_point(&Vector::new(0.0, 3.0, 0.0));
        assert_relative_eq!(pt, Point::new(0.0, 2.0, 0.0));
        assert_eq!(
            ball.local_support_point_without_margin(&Vector::x()),
            Point::origin()
        );
    }
}
