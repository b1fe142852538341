//! Shapes supported by carom3d.
//!
//! The collision queries only rely on the [`SupportMap`] capability of a shape; the few
//! concrete shapes provided here are meant for tests and simple scenes.

pub use self::ball::Ball;
pub use self::cuboid::{Cuboid, DEFAULT_CUBOID_MARGIN};
#[doc(inline)]
pub use self::shape::{Shape, ShapeType};
pub use self::shared_shape::SharedShape;
#[doc(inline)]
pub use self::support_map::SupportMap;
pub use self::triangle::Triangle;

mod ball;
mod cuboid;
mod shape;
mod shared_shape;
mod support_map;
mod triangle;
