//! Joints between rigid bodies.

pub use self::point_to_point::{ConstraintSetting, Point2PointConstraint};
pub(crate) use self::typed_constraint::constraint_island_id;
pub use self::typed_constraint::{ConstraintHandle, TypedConstraint};

mod point_to_point;
mod typed_constraint;
