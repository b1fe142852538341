use crate::math::{Point, Real, Vector};
use crate::shape::{Ball, Cuboid, Shape, Triangle};
use alloc::sync::Arc;
use core::fmt;
use core::ops::Deref;

/// A reference-counted, shareable geometric shape.
///
/// Cloning a `SharedShape` only increments a reference count, so the same shape can back any
/// number of rigid bodies.
#[derive(Clone)]
pub struct SharedShape(pub Arc<dyn Shape>);

impl Deref for SharedShape {
    type Target = dyn Shape;
    fn deref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl AsRef<dyn Shape> for SharedShape {
    fn as_ref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl fmt::Debug for SharedShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SharedShape ( Arc<{:?}> )", self.0.shape_type())
    }
}

impl SharedShape {
    /// Wraps the given shape as a shared shape.
    pub fn new(shape: impl Shape) -> Self {
        Self(Arc::new(shape))
    }

    /// Initialize a ball shape defined by its radius.
    pub fn ball(radius: Real) -> Self {
        SharedShape(Arc::new(Ball::new(radius)))
    }

    /// Initialize a cuboid shape defined by its half-extents.
    pub fn cuboid(hx: Real, hy: Real, hz: Real) -> Self {
        SharedShape(Arc::new(Cuboid::new(Vector::new(hx, hy, hz))))
    }

    /// Initializes a triangle shape.
    pub fn triangle(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Self {
        SharedShape(Arc::new(Triangle::new(a, b, c)))
    }
}

#[cfg(test)]
mod test {
    use super::SharedShape;
    use crate::shape::{Shape, ShapeType, SupportMap};

    #[test]
    fn downcast_shared_shapes() {
        let ball = SharedShape::ball(1.5);
        assert_eq!(ball.shape_type(), ShapeType::Ball);
        assert_eq!(ball.as_ball().map(|b| b.radius), Some(1.5));
        assert!(ball.as_cuboid().is_none());

        let clone = ball.clone();
        assert_eq!(clone.margin(), 1.5);
    }
}
