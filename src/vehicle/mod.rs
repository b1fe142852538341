//! Raycast vehicles: rigid-body chassis with suspension rays as wheels.

pub use self::raycast_vehicle::{RaycastVehicle, VehicleHandle};
pub use self::raycaster::{DefaultVehicleRaycaster, VehicleRaycaster, VehicleRaycasterResult};
pub use self::wheel_info::{RaycastInfo, VehicleTuning, WheelInfo, WheelInfoConstructionInfo};

mod raycast_vehicle;
mod raycaster;
mod wheel_info;
