use crate::dynamics::{RigidBody, RigidBodyHandle};
use crate::math::{Isometry, Point, Real, Vector};

/// The suspension and tire parameters shared by the wheels of a vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VehicleTuning {
    /// The spring stiffness, per unit of chassis mass (default: `5.88`).
    pub suspension_stiffness: Real,
    /// The damping applied while the suspension compresses (default: `0.83`).
    pub suspension_compression: Real,
    /// The damping applied while the suspension extends (default: `0.88`).
    pub suspension_damping: Real,
    /// The maximum distance, in centimeters, the suspension can travel from its rest
    /// length (default: `500`).
    pub max_suspension_travel_cm: Real,
    /// The friction coefficient of the tires (default: `10.5`).
    pub friction_slip: Real,
    /// The maximum force the suspension can apply (default: `6000`).
    pub max_suspension_force: Real,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            suspension_stiffness: 5.88,
            suspension_compression: 0.83,
            suspension_damping: 0.88,
            max_suspension_travel_cm: 500.0,
            friction_slip: 10.5,
            max_suspension_force: 6000.0,
        }
    }
}

/// The parameters used to add a wheel to a vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WheelInfoConstructionInfo {
    /// The point where the suspension is attached, in chassis space.
    pub chassis_connection_cs: Point<Real>,
    /// The direction of the suspension ray, in chassis space.
    pub wheel_direction_cs: Vector<Real>,
    /// The rotation axis of the wheel, in chassis space.
    pub wheel_axle_cs: Vector<Real>,
    /// The length of the suspension at rest.
    pub suspension_rest_length: Real,
    /// The maximum distance, in centimeters, the suspension can travel from its rest length.
    pub max_suspension_travel_cm: Real,
    /// The radius of the wheel.
    pub wheel_radius: Real,
    /// The spring stiffness, per unit of chassis mass.
    pub suspension_stiffness: Real,
    /// The damping applied while the suspension compresses.
    pub wheels_damping_compression: Real,
    /// The damping applied while the suspension extends.
    pub wheels_damping_relaxation: Real,
    /// The friction coefficient of the tire.
    pub friction_slip: Real,
    /// The maximum force the suspension can apply.
    pub max_suspension_force: Real,
    /// Is this a front wheel?
    pub is_front_wheel: bool,
}

/// The result of the suspension ray cast of a wheel, in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastInfo {
    /// The normal of the ground at the contact point.
    pub contact_normal_ws: Vector<Real>,
    /// The point where the wheel touches the ground.
    pub contact_point_ws: Point<Real>,
    /// The current length of the suspension.
    pub suspension_length: Real,
    /// The point where the suspension is attached to the chassis.
    pub hard_point_ws: Point<Real>,
    /// The direction of the suspension ray.
    pub wheel_direction_ws: Vector<Real>,
    /// The rotation axis of the wheel.
    pub wheel_axle_ws: Vector<Real>,
    /// Does the wheel touch the ground?
    pub is_in_contact: bool,
    /// The body hit by the suspension ray, if any.
    pub ground_object: Option<RigidBodyHandle>,
}

impl Default for RaycastInfo {
    fn default() -> Self {
        Self {
            contact_normal_ws: Vector::zeros(),
            contact_point_ws: Point::origin(),
            suspension_length: 0.0,
            hard_point_ws: Point::origin(),
            wheel_direction_ws: Vector::zeros(),
            wheel_axle_ws: Vector::zeros(),
            is_in_contact: false,
            ground_object: None,
        }
    }
}

/// A wheel of a [`RaycastVehicle`](crate::vehicle::RaycastVehicle).
#[derive(Clone, Debug, PartialEq)]
pub struct WheelInfo {
    /// The last suspension ray cast.
    pub raycast_info: RaycastInfo,
    /// The world transform of the wheel, including its steering and spin.
    pub world_transform: Isometry<Real>,
    /// The point where the suspension is attached, in chassis space.
    pub chassis_connection_point_cs: Point<Real>,
    /// The direction of the suspension ray, in chassis space.
    pub wheel_direction_cs: Vector<Real>,
    /// The rotation axis of the wheel, in chassis space.
    pub wheel_axle_cs: Vector<Real>,
    /// The length of the suspension at rest.
    pub suspension_rest_length: Real,
    /// The maximum distance, in centimeters, the suspension can travel from its rest length.
    pub max_suspension_travel_cm: Real,
    /// The radius of the wheel.
    pub wheels_radius: Real,
    /// The spring stiffness, per unit of chassis mass.
    pub suspension_stiffness: Real,
    /// The damping applied while the suspension compresses.
    pub wheels_damping_compression: Real,
    /// The damping applied while the suspension extends.
    pub wheels_damping_relaxation: Real,
    /// The friction coefficient of the tire.
    pub friction_slip: Real,
    /// The steering angle, in radians.
    pub steering: Real,
    /// The spin angle of the wheel, in radians.
    pub rotation: Real,
    /// The spin angle added during the last step.
    pub delta_rotation: Real,
    /// How much the side friction rolls the chassis, from `0` (no roll) to `1`
    /// (default: `0.1`).
    pub roll_influence: Real,
    /// The maximum force the suspension can apply.
    pub max_suspension_force: Real,
    /// The engine force applied by this wheel.
    pub engine_force: Real,
    /// The maximum braking impulse of this wheel.
    pub brake: Real,
    /// Is this a front wheel?
    pub is_front_wheel: bool,
    /// Data attached to this wheel by the application.
    pub user_data: u128,
    /// The inverse of the projection of the contact normal on the suspension direction.
    pub clipped_inv_contact_dot_suspension: Real,
    /// The velocity of the chassis relative to the ground, along the suspension.
    pub suspension_relative_velocity: Real,
    /// The suspension force computed during the last step.
    pub wheels_suspension_force: Real,
    /// The ratio of the tire impulses kept after the friction clipping, `1` if the wheel
    /// doesn't skid.
    pub skid_info: Real,
}

impl WheelInfo {
    /// Creates a wheel from its construction info.
    pub fn new(info: &WheelInfoConstructionInfo) -> Self {
        Self {
            raycast_info: RaycastInfo::default(),
            world_transform: Isometry::identity(),
            chassis_connection_point_cs: info.chassis_connection_cs,
            wheel_direction_cs: info.wheel_direction_cs,
            wheel_axle_cs: info.wheel_axle_cs,
            suspension_rest_length: info.suspension_rest_length,
            max_suspension_travel_cm: info.max_suspension_travel_cm,
            wheels_radius: info.wheel_radius,
            suspension_stiffness: info.suspension_stiffness,
            wheels_damping_compression: info.wheels_damping_compression,
            wheels_damping_relaxation: info.wheels_damping_relaxation,
            friction_slip: info.friction_slip,
            steering: 0.0,
            rotation: 0.0,
            delta_rotation: 0.0,
            roll_influence: 0.1,
            max_suspension_force: info.max_suspension_force,
            engine_force: 0.0,
            brake: 0.0,
            is_front_wheel: info.is_front_wheel,
            user_data: 0,
            clipped_inv_contact_dot_suspension: 0.0,
            suspension_relative_velocity: 0.0,
            wheels_suspension_force: 0.0,
            skid_info: 0.0,
        }
    }

    /// The length of the suspension at rest.
    #[inline]
    pub fn suspension_rest_length(&self) -> Real {
        self.suspension_rest_length
    }

    /// Puts the suspension back at rest, out of contact.
    pub fn reset_suspension(&mut self) {
        self.raycast_info.suspension_length = self.suspension_rest_length;
        self.suspension_relative_velocity = 0.0;
        self.raycast_info.contact_normal_ws = -self.raycast_info.wheel_direction_ws;
        self.clipped_inv_contact_dot_suspension = 1.0;
    }

    /// Updates the suspension velocity terms from the last ray cast.
    pub fn update_wheel(&mut self, chassis: &RigidBody) {
        if !self.raycast_info.is_in_contact {
            self.reset_suspension();
            return;
        }

        let normal = self.raycast_info.contact_normal_ws;
        let project = normal.dot(&self.raycast_info.wheel_direction_ws);
        let rel_pos = self.raycast_info.contact_point_ws - chassis.center_of_mass_position();
        let proj_vel = normal.dot(&chassis.velocity_in_local_point(&rel_pos));

        if project >= -0.1 {
            self.suspension_relative_velocity = 0.0;
            self.clipped_inv_contact_dot_suspension = 1.0 / 0.1;
        } else {
            let inv = -1.0 / project;
            self.suspension_relative_velocity = proj_vel * inv;
            self.clipped_inv_contact_dot_suspension = inv;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reset_suspension_restores_rest_state() {
        let info = WheelInfoConstructionInfo {
            chassis_connection_cs: Point::origin(),
            wheel_direction_cs: -Vector::y(),
            wheel_axle_cs: -Vector::x(),
            suspension_rest_length: 0.6,
            max_suspension_travel_cm: 500.0,
            wheel_radius: 0.5,
            suspension_stiffness: 20.0,
            wheels_damping_compression: 4.4,
            wheels_damping_relaxation: 2.3,
            friction_slip: 1000.0,
            max_suspension_force: 6000.0,
            is_front_wheel: true,
        };
        let mut wheel = WheelInfo::new(&info);
        wheel.raycast_info.wheel_direction_ws = -Vector::y();
        wheel.raycast_info.suspension_length = 0.1;
        wheel.suspension_relative_velocity = 3.0;

        wheel.reset_suspension();
        assert_eq!(wheel.raycast_info.suspension_length, 0.6);
        assert_eq!(wheel.suspension_relative_velocity, 0.0);
        assert_eq!(wheel.raycast_info.contact_normal_ws, Vector::y());
        assert_eq!(wheel.clipped_inv_contact_dot_suspension, 1.0);
    }
}
