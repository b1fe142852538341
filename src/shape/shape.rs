use crate::math::{Real, Vector};
use crate::shape::{Ball, Cuboid, SupportMap, Triangle};
use downcast_rs::{impl_downcast, DowncastSync};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// Enum representing the type of a shape.
pub enum ShapeType {
    /// A ball shape.
    Ball = 0,
    /// A cuboid shape.
    Cuboid,
    /// A triangle shape.
    Triangle,
    /// A custom shape type.
    Custom,
}

/// Trait implemented by shapes usable by the dynamics world.
///
/// Only the support mapping is needed by the collision queries. The inertia is used once,
/// when a rigid body is created from this shape.
pub trait Shape: SupportMap + DowncastSync {
    /// Gets the type tag of this shape.
    fn shape_type(&self) -> ShapeType {
        ShapeType::Custom
    }

    /// Converts this shape to its support mapping.
    fn as_support_map(&self) -> &dyn SupportMap;

    /// The principal inertia of this shape, with the given mass, about its local frame origin.
    fn compute_local_inertia(&self, mass: Real) -> Vector<Real>;
}

impl_downcast!(sync Shape);

impl dyn Shape {
    /// Converts this abstract shape to the given shape, if it is one.
    pub fn as_shape<T: Shape>(&self) -> Option<&T> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a ball, if it is one.
    pub fn as_ball(&self) -> Option<&Ball> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a cuboid, if it is one.
    pub fn as_cuboid(&self) -> Option<&Cuboid> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a triangle, if it is one.
    pub fn as_triangle(&self) -> Option<&Triangle> {
        self.downcast_ref()
    }
}
