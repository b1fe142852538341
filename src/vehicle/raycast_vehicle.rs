use crate::dynamics::{DebugRenderBackend, RigidBody, RigidBodyHandle, RigidBodySet};
use crate::math::{Isometry, Point, Real, Rotation, Vector};
use crate::utils;
use crate::vehicle::{
    VehicleRaycaster, VehicleTuning, WheelInfo, WheelInfoConstructionInfo,
};
use alloc::boxed::Box;
use alloc::vec::Vec;
use na::Unit;

/// The identifier of a vehicle inserted into a dynamics world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VehicleHandle(pub(crate) usize);

const SIDE_FRICTION_STIFFNESS2: Real = 1.0;
const FWD_FACTOR: Real = 0.5;
const SIDE_FACTOR: Real = 1.0;
const CONTACT_DAMPING: Real = 0.2;

/// A vehicle whose wheels are modeled as suspension rays.
///
/// The chassis is a regular dynamic rigid body. Each step, a ray is cast along the suspension
/// of each wheel; the suspension, engine, brake, and tire friction are then applied to the
/// chassis as impulses at the contact points.
pub struct RaycastVehicle {
    tuning: VehicleTuning,
    chassis: RigidBodyHandle,
    raycaster: Box<dyn VehicleRaycaster>,
    wheels: Vec<WheelInfo>,
    current_vehicle_speed_km_hour: Real,
    index_right_axis: usize,
    index_up_axis: usize,
    index_forward_axis: usize,
    forward_ws: Vec<Vector<Real>>,
    axle: Vec<Vector<Real>>,
    forward_impulse: Vec<Real>,
    side_impulse: Vec<Real>,
}

impl core::fmt::Debug for RaycastVehicle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RaycastVehicle")
            .field("tuning", &self.tuning)
            .field("chassis", &self.chassis)
            .field("wheels", &self.wheels)
            .field("current_vehicle_speed_km_hour", &self.current_vehicle_speed_km_hour)
            .finish()
    }
}

/// The velocity of a point of an optional body, and its impulse denominator along `dir`.
fn ground_response(
    body: Option<&RigidBody>,
    point: &Point<Real>,
    dir: &Vector<Real>,
) -> (Vector<Real>, Real) {
    match body {
        Some(body) => {
            let rel_pos = point - body.center_of_mass_position();
            (
                body.velocity_in_local_point(&rel_pos),
                body.compute_impulse_denominator(point, dir),
            )
        }
        None => (Vector::zeros(), 0.0),
    }
}

/// The impulse, damped by [`CONTACT_DAMPING`], cancelling the relative velocity of two bodies
/// along `normal` at `pos`.
fn resolve_single_bilateral(
    body1: &RigidBody,
    body2: Option<&RigidBody>,
    pos: &Point<Real>,
    normal: &Vector<Real>,
) -> Real {
    if normal.norm_squared() > 1.1 {
        return 0.0;
    }

    let rel_pos1 = pos - body1.center_of_mass_position();
    let vel1 = body1.velocity_in_local_point(&rel_pos1);
    let denom1 = body1.compute_impulse_denominator(pos, normal);
    let (vel2, denom2) = ground_response(body2, pos, normal);

    let jac_diag_ab = denom1 + denom2;
    if jac_diag_ab == 0.0 {
        return 0.0;
    }

    let rel_vel = normal.dot(&(vel1 - vel2));
    -CONTACT_DAMPING * rel_vel / jac_diag_ab
}

/// The rolling friction impulse along `dir`, bounded by `max_impulse`.
fn calc_rolling_friction(
    chassis: &RigidBody,
    ground: Option<&RigidBody>,
    pos: &Point<Real>,
    dir: &Vector<Real>,
    max_impulse: Real,
) -> Real {
    let rel_pos = pos - chassis.center_of_mass_position();
    let vel1 = chassis.velocity_in_local_point(&rel_pos);
    let denom0 = chassis.compute_impulse_denominator(pos, dir);
    let (vel2, denom1) = ground_response(ground, pos, dir);

    let denom = denom0 + denom1;
    if denom == 0.0 {
        return 0.0;
    }

    let vrel = dir.dot(&(vel1 - vel2));
    (-vrel / denom).clamp(-max_impulse, max_impulse)
}

impl RaycastVehicle {
    /// Creates a vehicle without wheels driven by the body `chassis`.
    ///
    /// The default coordinate system has its right, up, and forward axes along the chassis
    /// `x`, `z`, and `y` axes.
    pub fn new(
        tuning: VehicleTuning,
        chassis: RigidBodyHandle,
        raycaster: Box<dyn VehicleRaycaster>,
    ) -> Self {
        Self {
            tuning,
            chassis,
            raycaster,
            wheels: Vec::new(),
            current_vehicle_speed_km_hour: 0.0,
            index_right_axis: 0,
            index_up_axis: 2,
            index_forward_axis: 1,
            forward_ws: Vec::new(),
            axle: Vec::new(),
            forward_impulse: Vec::new(),
            side_impulse: Vec::new(),
        }
    }

    /// The body used as chassis.
    #[inline]
    pub fn chassis(&self) -> RigidBodyHandle {
        self.chassis
    }

    /// The tuning used for new wheels.
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Selects which chassis axes are right, up and forward.
    pub fn set_coordinate_system(&mut self, right_index: usize, up_index: usize, forward_index: usize) {
        debug_assert!(right_index < 3 && up_index < 3 && forward_index < 3);
        self.index_right_axis = right_index;
        self.index_up_axis = up_index;
        self.index_forward_axis = forward_index;
    }

    /// The index of the chassis right axis.
    pub fn right_axis(&self) -> usize {
        self.index_right_axis
    }

    /// The index of the chassis up axis.
    pub fn up_axis(&self) -> usize {
        self.index_up_axis
    }

    /// The index of the chassis forward axis.
    pub fn forward_axis(&self) -> usize {
        self.index_forward_axis
    }

    /// Adds a wheel to this vehicle, configured by `tuning`.
    pub fn add_wheel(
        &mut self,
        bodies: &RigidBodySet,
        connection_point_cs: Point<Real>,
        wheel_direction_cs: Vector<Real>,
        wheel_axle_cs: Vector<Real>,
        suspension_rest_length: Real,
        wheel_radius: Real,
        tuning: &VehicleTuning,
        is_front_wheel: bool,
    ) -> &mut WheelInfo {
        let info = WheelInfoConstructionInfo {
            chassis_connection_cs: connection_point_cs,
            wheel_direction_cs,
            wheel_axle_cs,
            suspension_rest_length,
            max_suspension_travel_cm: tuning.max_suspension_travel_cm,
            wheel_radius,
            suspension_stiffness: tuning.suspension_stiffness,
            wheels_damping_compression: tuning.suspension_compression,
            wheels_damping_relaxation: tuning.suspension_damping,
            friction_slip: tuning.friction_slip,
            max_suspension_force: tuning.max_suspension_force,
            is_front_wheel,
        };

        self.wheels.push(WheelInfo::new(&info));
        let wheel_index = self.wheels.len() - 1;
        self.update_wheel_transform(bodies, wheel_index, false);
        &mut self.wheels[wheel_index]
    }

    /// The number of wheels.
    #[inline]
    pub fn num_wheels(&self) -> usize {
        self.wheels.len()
    }

    /// The wheels of this vehicle.
    #[inline]
    pub fn wheels(&self) -> &[WheelInfo] {
        &self.wheels
    }

    /// The wheel with the given index.
    pub fn wheel_info(&self, index: usize) -> &WheelInfo {
        &self.wheels[index]
    }

    /// The wheel with the given index, mutably.
    pub fn wheel_info_mut(&mut self, index: usize) -> &mut WheelInfo {
        &mut self.wheels[index]
    }

    /// The world transform of a wheel, as of the last call to
    /// [`Self::update_wheel_transform`].
    pub fn wheel_transform_ws(&self, index: usize) -> &Isometry<Real> {
        &self.wheels[index].world_transform
    }

    /// The speed of the chassis in km/h, negative when it moves backward.
    pub fn current_speed_km_hour(&self) -> Real {
        self.current_vehicle_speed_km_hour
    }

    /// The world-space forward axis of the chassis.
    pub fn forward_vector(&self, bodies: &RigidBodySet) -> Vector<Real> {
        bodies
            .get(self.chassis)
            .map(|chassis| {
                utils::rotation_basis(chassis.center_of_mass_transform())
                    .column(self.index_forward_axis)
                    .into_owned()
            })
            .unwrap_or_else(Vector::zeros)
    }

    /// Sets the steering angle of a wheel, in radians.
    pub fn set_steering_value(&mut self, steering: Real, wheel: usize) {
        self.wheels[wheel].steering = steering;
    }

    /// The steering angle of a wheel, in radians.
    pub fn steering_value(&self, wheel: usize) -> Real {
        self.wheels[wheel].steering
    }

    /// Sets the engine force applied by a wheel.
    pub fn apply_engine_force(&mut self, force: Real, wheel: usize) {
        self.wheels[wheel].engine_force = force;
    }

    /// Sets the maximum braking impulse of a wheel.
    pub fn set_brake(&mut self, brake: Real, wheel: usize) {
        self.wheels[wheel].brake = brake;
    }

    /// Puts all the suspensions back at rest.
    pub fn reset_suspension(&mut self) {
        for wheel in &mut self.wheels {
            wheel.reset_suspension();
        }
    }

    fn chassis_transform(&self, chassis: &RigidBody, interpolated: bool) -> Isometry<Real> {
        if interpolated {
            if let Some(state) = chassis.motion_state() {
                return state.world_transform();
            }
        }
        *chassis.center_of_mass_transform()
    }

    fn update_wheel_transforms_ws(&mut self, chassis: &RigidBody, wheel: usize, interpolated: bool) {
        let transform = self.chassis_transform(chassis, interpolated);
        let wheel = &mut self.wheels[wheel];

        wheel.raycast_info.is_in_contact = false;
        wheel.raycast_info.hard_point_ws = transform * wheel.chassis_connection_point_cs;
        wheel.raycast_info.wheel_direction_ws = transform.rotation * wheel.wheel_direction_cs;
        wheel.raycast_info.wheel_axle_ws = transform.rotation * wheel.wheel_axle_cs;
    }

    /// Updates the world transform of a wheel from the chassis transform, the suspension
    /// length, the steering, and the spin of the wheel.
    ///
    /// The local `x`, `y` and `z` axes of the wheel transform are its axle, its rolling
    /// direction, and the opposite of its suspension direction.
    ///
    /// If `interpolated` is set, the chassis transform is read from its motion state. A wheel
    /// whose axle is parallel to its suspension direction has no valid frame and keeps its
    /// previous transform.
    pub fn update_wheel_transform(&mut self, bodies: &RigidBodySet, wheel_index: usize, interpolated: bool) {
        let Some(chassis) = bodies.get(self.chassis) else {
            return;
        };

        self.update_wheel_transforms_ws(chassis, wheel_index, interpolated);
        let wheel = &mut self.wheels[wheel_index];

        let up = (-wheel.raycast_info.wheel_direction_ws).try_normalize(Real::EPSILON);
        let right = wheel.raycast_info.wheel_axle_ws.try_normalize(Real::EPSILON);
        let (Some(up), Some(right)) = (up, right) else {
            log::debug!("Wheel {} has a degenerate suspension or axle.", wheel_index);
            return;
        };
        let Some(fwd) = up.cross(&right).try_normalize(Real::EPSILON) else {
            log::debug!("Wheel {} has an axle parallel to its suspension.", wheel_index);
            return;
        };

        let steering = Rotation::from_axis_angle(&Unit::new_unchecked(up), wheel.steering);
        let spin = Rotation::from_axis_angle(&Unit::new_unchecked(right), -wheel.rotation);
        let basis = na::Matrix3::from_columns(&[right, fwd, up]);
        let rotation = steering * spin * utils::basis_to_rotation(&basis);

        let origin = wheel.raycast_info.hard_point_ws
            + wheel.raycast_info.wheel_direction_ws * wheel.raycast_info.suspension_length;
        wheel.world_transform = Isometry::from_parts(origin.coords.into(), rotation);
    }

    /// Casts the suspension ray of a wheel and updates its contact information.
    fn ray_cast(&mut self, bodies: &RigidBodySet, wheel_index: usize) {
        let Some(chassis) = bodies.get(self.chassis) else {
            return;
        };
        self.update_wheel_transforms_ws(chassis, wheel_index, false);

        let wheel = &mut self.wheels[wheel_index];
        let ray_len = wheel.suspension_rest_length + wheel.wheels_radius;
        let source = wheel.raycast_info.hard_point_ws;
        let target = source + wheel.raycast_info.wheel_direction_ws * ray_len;
        wheel.raycast_info.contact_point_ws = target;
        wheel.raycast_info.ground_object = None;

        let Some(hit) = self
            .raycaster
            .cast_ray(bodies, &source, &target, Some(self.chassis))
        else {
            log::trace!("Suspension ray of wheel {} missed the ground.", wheel_index);
            wheel.raycast_info.suspension_length = wheel.suspension_rest_length;
            wheel.suspension_relative_velocity = 0.0;
            wheel.raycast_info.contact_normal_ws = -wheel.raycast_info.wheel_direction_ws;
            wheel.clipped_inv_contact_dot_suspension = 1.0;
            return;
        };

        let depth = ray_len * hit.fraction;
        wheel.raycast_info.contact_normal_ws = hit.hit_normal;
        wheel.raycast_info.is_in_contact = true;
        wheel.raycast_info.ground_object = hit.body;

        let travel = wheel.max_suspension_travel_cm * 0.01;
        let min_length = wheel.suspension_rest_length - travel;
        let max_length = wheel.suspension_rest_length + travel;
        wheel.raycast_info.suspension_length =
            (depth - wheel.wheels_radius).clamp(min_length, max_length);
        wheel.raycast_info.contact_point_ws = hit.hit_point;

        wheel.update_wheel(chassis);
    }

    /// Advances the vehicle by `dt`: casts the suspension rays, then applies the suspension,
    /// engine, brake, and tire impulses to the chassis.
    pub fn update_vehicle(&mut self, bodies: &mut RigidBodySet, dt: Real) {
        for i in 0..self.wheels.len() {
            self.update_wheel_transform(bodies, i, false);
        }

        let Some(chassis) = bodies.get(self.chassis) else {
            return;
        };

        let forward_w = utils::rotation_basis(chassis.center_of_mass_transform())
            .column(self.index_forward_axis)
            .into_owned();
        self.current_vehicle_speed_km_hour = 3.6 * chassis.linvel().norm();
        if forward_w.dot(chassis.linvel()) < 0.0 {
            self.current_vehicle_speed_km_hour = -self.current_vehicle_speed_km_hour;
        }

        for i in 0..self.wheels.len() {
            self.ray_cast(bodies, i);
        }

        let Some(chassis_mass) = bodies
            .get(self.chassis)
            .map(|b| if b.inv_mass() != 0.0 { 1.0 / b.inv_mass() } else { 0.0 })
        else {
            return;
        };
        self.update_suspension(chassis_mass);

        let Some(chassis) = bodies.get_mut(self.chassis) else {
            return;
        };

        for wheel in &self.wheels {
            let suspension_force = wheel.wheels_suspension_force.min(wheel.max_suspension_force);
            let impulse = wheel.raycast_info.contact_normal_ws * suspension_force * dt;
            let rel_pos = wheel.raycast_info.contact_point_ws - chassis.center_of_mass_position();
            chassis.apply_impulse(&impulse, &rel_pos);
        }

        self.update_friction(bodies, dt);

        let Some(chassis) = bodies.get(self.chassis) else {
            return;
        };
        let chassis_basis = utils::rotation_basis(chassis.center_of_mass_transform());

        for wheel in &mut self.wheels {
            let rel_pos = wheel.raycast_info.hard_point_ws - chassis.center_of_mass_position();
            let vel = chassis.velocity_in_local_point(&rel_pos);

            if wheel.raycast_info.is_in_contact {
                let normal = wheel.raycast_info.contact_normal_ws;
                let mut fwd = chassis_basis.column(self.index_forward_axis).into_owned();
                fwd -= normal * fwd.dot(&normal);

                wheel.delta_rotation = fwd.dot(&vel) * dt / wheel.wheels_radius;
                wheel.rotation += wheel.delta_rotation;
            } else {
                wheel.rotation += wheel.delta_rotation;
            }

            // Airborne wheels slowly stop spinning.
            wheel.delta_rotation *= 0.99;
        }
    }

    /// Computes the suspension force of each wheel, scaled by the chassis mass.
    fn update_suspension(&mut self, chassis_mass: Real) {
        for wheel in &mut self.wheels {
            if !wheel.raycast_info.is_in_contact {
                wheel.wheels_suspension_force = 0.0;
                continue;
            }

            let length_diff = wheel.suspension_rest_length - wheel.raycast_info.suspension_length;
            let mut force =
                wheel.suspension_stiffness * length_diff * wheel.clipped_inv_contact_dot_suspension;

            let rel_vel = wheel.suspension_relative_velocity;
            let damping = if rel_vel < 0.0 {
                wheel.wheels_damping_compression
            } else {
                wheel.wheels_damping_relaxation
            };
            force -= damping * rel_vel;

            wheel.wheels_suspension_force = (force * chassis_mass).max(0.0);
        }
    }

    /// Applies the engine, brake and tire side impulses.
    fn update_friction(&mut self, bodies: &mut RigidBodySet, dt: Real) {
        let num_wheels = self.wheels.len();
        if num_wheels == 0 {
            return;
        }

        self.forward_ws.clear();
        self.forward_ws.resize(num_wheels, Vector::zeros());
        self.axle.clear();
        self.axle.resize(num_wheels, Vector::zeros());
        self.forward_impulse.clear();
        self.forward_impulse.resize(num_wheels, 0.0);
        self.side_impulse.clear();
        self.side_impulse.resize(num_wheels, 0.0);

        let Some(chassis) = bodies.get(self.chassis) else {
            return;
        };

        for (i, wheel) in self.wheels.iter().enumerate() {
            if !wheel.raycast_info.is_in_contact {
                continue;
            }

            let ground = wheel.raycast_info.ground_object.and_then(|h| bodies.get(h));
            let normal = wheel.raycast_info.contact_normal_ws;
            let mut axle = utils::rotation_basis(&wheel.world_transform)
                .column(0)
                .into_owned();
            axle -= normal * axle.dot(&normal);
            let axle = axle.try_normalize(Real::EPSILON).unwrap_or_else(Vector::zeros);
            let forward = normal.cross(&axle).try_normalize(Real::EPSILON).unwrap_or_else(Vector::zeros);

            self.axle[i] = axle;
            self.forward_ws[i] = forward;
            self.side_impulse[i] = resolve_single_bilateral(
                chassis,
                ground,
                &wheel.raycast_info.contact_point_ws,
                &axle,
            ) * SIDE_FRICTION_STIFFNESS2;
        }

        let mut sliding = false;

        for (i, wheel) in self.wheels.iter_mut().enumerate() {
            wheel.skid_info = 1.0;

            if !wheel.raycast_info.is_in_contact {
                continue;
            }

            let rolling_friction = if wheel.engine_force != 0.0 {
                wheel.engine_force * dt
            } else {
                let ground = wheel.raycast_info.ground_object.and_then(|h| bodies.get(h));
                calc_rolling_friction(
                    chassis,
                    ground,
                    &wheel.raycast_info.contact_point_ws,
                    &self.forward_ws[i],
                    wheel.brake,
                )
            };

            self.forward_impulse[i] = rolling_friction;

            let max_impulse = wheel.wheels_suspension_force * dt * wheel.friction_slip;
            let x = self.forward_impulse[i] * FWD_FACTOR;
            let y = self.side_impulse[i] * SIDE_FACTOR;
            let impulse_squared = x * x + y * y;

            if impulse_squared > max_impulse * max_impulse {
                sliding = true;
                wheel.skid_info *= max_impulse / impulse_squared.sqrt();
            }
        }

        if sliding {
            for (i, wheel) in self.wheels.iter().enumerate() {
                if self.side_impulse[i] != 0.0 && wheel.skid_info < 1.0 {
                    self.forward_impulse[i] *= wheel.skid_info;
                    self.side_impulse[i] *= wheel.skid_info;
                }
            }
        }

        let chassis_up = utils::rotation_basis(chassis.center_of_mass_transform())
            .column(self.index_up_axis)
            .into_owned();

        for (i, wheel) in self.wheels.iter().enumerate() {
            let contact_point = wheel.raycast_info.contact_point_ws;
            let Some(chassis) = bodies.get_mut(self.chassis) else {
                return;
            };
            let mut rel_pos = contact_point - chassis.center_of_mass_position();

            if self.forward_impulse[i] != 0.0 {
                chassis.apply_impulse(&(self.forward_ws[i] * self.forward_impulse[i]), &rel_pos);
            }

            if self.side_impulse[i] != 0.0 {
                let side_impulse = self.axle[i] * self.side_impulse[i];
                rel_pos -= chassis_up * (chassis_up.dot(&rel_pos) * (1.0 - wheel.roll_influence));
                chassis.apply_impulse(&side_impulse, &rel_pos);

                if let Some(ground) = wheel
                    .raycast_info
                    .ground_object
                    .and_then(|h| bodies.get_mut(h))
                {
                    if !ground.is_static_or_kinematic() {
                        let rel_pos2 = contact_point - ground.center_of_mass_position();
                        ground.apply_impulse(&-side_impulse, &rel_pos2);
                    }
                }
            }
        }
    }

    /// Draws the wheels of this vehicle: their axle, and a line to their contact point.
    pub fn debug_draw(&self, backend: &mut dyn DebugRenderBackend) {
        for wheel in &self.wheels {
            let color = if wheel.raycast_info.is_in_contact {
                Vector::new(0.0, 0.0, 1.0)
            } else {
                Vector::new(1.0, 0.0, 1.0)
            };

            let center = Point::from(wheel.world_transform.translation.vector);
            let axle = utils::rotation_basis(&wheel.world_transform)
                .column(0)
                .into_owned();

            backend.draw_line(&center, &(center + axle), &color);
            backend.draw_line(&center, &wheel.raycast_info.contact_point_ws, &color);
        }
    }
}
