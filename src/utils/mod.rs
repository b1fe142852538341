//! Various unsorted geometrical and logical operators.

pub use self::pool::ObjectPool;
pub use self::transform_util::{
    aabb_from_support_map, basis_to_rotation, calculate_diff_axis_angle, calculate_velocity,
    integrate_transform, plane_space, rotation_basis, ANGULAR_MOTION_THRESHOLD,
};
pub(crate) use self::wops::WSign;

mod pool;
mod transform_util;
mod wops;
