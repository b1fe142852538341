use crate::dynamics::{ActivationState, MotionState};
use crate::math::{Isometry, Matrix, Point, Real, Vector};
use crate::query::ContactMaterial;
use crate::shape::SharedShape;
use crate::utils::{self, calculate_velocity};
use alloc::boxed::Box;

/// The maximum angle, in radians, a body is allowed to rotate during a single step.
pub const MAX_ANGVEL: Real = core::f32::consts::FRAC_PI_2;

/// Below this speed, the additional damping snaps velocities to zero.
const ADDITIONAL_DAMPING_SNAP_SPEED: Real = 0.005;

bitflags::bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    /// Flags affecting how a rigid body takes part in the simulation.
    pub struct CollisionFlags: u8 {
        /// The body has an infinite mass and never moves.
        const STATIC = 1;
        /// The body is moved by the application, through its motion state.
        const KINEMATIC = 1 << 1;
        /// The body generates contacts that are never solved.
        const NO_CONTACT_RESPONSE = 1 << 2;
    }
}

/// The parameters used to create a rigid body.
///
/// Only the mass, shape, and local inertia have to be given explicitly. All the other
/// fields have reasonable defaults and may be modified before the body is created.
#[derive(Debug)]
pub struct RigidBodyConstructionInfo {
    /// The mass of the body. A zero mass makes the body static.
    pub mass: Real,
    /// The motion state the initial transform is read from, and the simulated one pushed to.
    pub motion_state: Option<Box<dyn MotionState>>,
    /// The initial center-of-mass transform, used if there is no motion state.
    pub start_world_transform: Isometry<Real>,
    /// The collision shape of the body.
    pub shape: SharedShape,
    /// The principal inertia of the body.
    pub local_inertia: Vector<Real>,
    /// The linear damping coefficient, in `[0, 1]`.
    pub linear_damping: Real,
    /// The angular damping coefficient, in `[0, 1]`.
    pub angular_damping: Real,
    /// The friction coefficient.
    pub friction: Real,
    /// The restitution coefficient.
    pub restitution: Real,
    /// The linear speed under which the body is considered at rest.
    pub linear_sleeping_threshold: Real,
    /// The angular speed under which the body is considered at rest.
    pub angular_sleeping_threshold: Real,
    /// Enables the extra damping of slow bodies.
    pub additional_damping: bool,
    /// The factor applied to the velocities of slow bodies by the extra damping.
    pub additional_damping_factor: Real,
    /// The squared linear speed under which the extra damping applies.
    pub additional_linear_damping_threshold_sqr: Real,
    /// The squared angular speed under which the extra damping applies.
    pub additional_angular_damping_threshold_sqr: Real,
}

impl RigidBodyConstructionInfo {
    /// Construction parameters for a body with the given mass, shape and inertia.
    pub fn new(mass: Real, shape: SharedShape, local_inertia: Vector<Real>) -> Self {
        Self {
            mass,
            motion_state: None,
            start_world_transform: Isometry::identity(),
            shape,
            local_inertia,
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 0.5,
            restitution: 0.0,
            linear_sleeping_threshold: 0.8,
            angular_sleeping_threshold: 1.0,
            additional_damping: false,
            additional_damping_factor: 0.005,
            additional_linear_damping_threshold_sqr: 0.01,
            additional_angular_damping_threshold_sqr: 0.01,
        }
    }

    /// Construction parameters with an inertia computed from the shape.
    pub fn from_shape(mass: Real, shape: SharedShape) -> Self {
        let local_inertia = if mass != 0.0 {
            shape.compute_local_inertia(mass)
        } else {
            Vector::zeros()
        };
        Self::new(mass, shape, local_inertia)
    }

    /// Sets the initial transform.
    pub fn with_transform(mut self, transform: Isometry<Real>) -> Self {
        self.start_world_transform = transform;
        self
    }

    /// Sets the motion state.
    pub fn with_motion_state(mut self, motion_state: Box<dyn MotionState>) -> Self {
        self.motion_state = Some(motion_state);
        self
    }
}

/// A rigid body: a shape with mass properties, velocities, and an activation state.
///
/// A body with a zero inverse mass is static or kinematic, and is never integrated.
#[derive(Debug)]
pub struct RigidBody {
    world_transform: Isometry<Real>,
    pub(crate) interpolation_world_transform: Isometry<Real>,
    interpolation_linvel: Vector<Real>,
    interpolation_angvel: Vector<Real>,
    inv_inertia_local: Vector<Real>,
    inv_inertia_tensor_world: Matrix<Real>,
    linvel: Vector<Real>,
    angvel: Vector<Real>,
    inv_mass: Real,
    gravity: Vector<Real>,
    total_force: Vector<Real>,
    total_torque: Vector<Real>,
    linear_damping: Real,
    angular_damping: Real,
    additional_damping: bool,
    additional_damping_factor: Real,
    additional_linear_damping_threshold_sqr: Real,
    additional_angular_damping_threshold_sqr: Real,
    linear_sleeping_threshold: Real,
    angular_sleeping_threshold: Real,
    friction: Real,
    restitution: Real,
    shape: SharedShape,
    motion_state: Option<Box<dyn MotionState>>,
    activation_state: ActivationState,
    deactivation_time: Real,
    collision_flags: CollisionFlags,
    pub(crate) island_tag: Option<usize>,
    /// Data attached to this body by the application.
    pub user_data: u128,
}

impl RigidBody {
    /// Creates a new rigid body.
    pub fn new(info: RigidBodyConstructionInfo) -> Self {
        let world_transform = info
            .motion_state
            .as_ref()
            .map(|state| state.world_transform())
            .unwrap_or(info.start_world_transform);

        let mut body = Self {
            world_transform,
            interpolation_world_transform: world_transform,
            interpolation_linvel: Vector::zeros(),
            interpolation_angvel: Vector::zeros(),
            inv_inertia_local: Vector::zeros(),
            inv_inertia_tensor_world: Matrix::zeros(),
            linvel: Vector::zeros(),
            angvel: Vector::zeros(),
            inv_mass: 0.0,
            gravity: Vector::zeros(),
            total_force: Vector::zeros(),
            total_torque: Vector::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            additional_damping: info.additional_damping,
            additional_damping_factor: info.additional_damping_factor,
            additional_linear_damping_threshold_sqr: info.additional_linear_damping_threshold_sqr,
            additional_angular_damping_threshold_sqr: info
                .additional_angular_damping_threshold_sqr,
            linear_sleeping_threshold: info.linear_sleeping_threshold,
            angular_sleeping_threshold: info.angular_sleeping_threshold,
            friction: info.friction,
            restitution: info.restitution,
            shape: info.shape,
            motion_state: info.motion_state,
            activation_state: ActivationState::Active,
            deactivation_time: 0.0,
            collision_flags: CollisionFlags::empty(),
            island_tag: None,
            user_data: 0,
        };

        body.set_damping(info.linear_damping, info.angular_damping);
        body.set_mass_props(info.mass, &info.local_inertia);
        body
    }

    /*
     * Transforms and velocities.
     */
    /// The transform of the center of mass of this body.
    #[inline]
    pub fn center_of_mass_transform(&self) -> &Isometry<Real> {
        &self.world_transform
    }

    /// The world-space center of mass of this body.
    #[inline]
    pub fn center_of_mass_position(&self) -> Point<Real> {
        self.world_transform.translation.vector.into()
    }

    /// The transform at the beginning of the current step, or the predicted transform during
    /// a step.
    #[inline]
    pub fn interpolation_world_transform(&self) -> &Isometry<Real> {
        &self.interpolation_world_transform
    }

    /// Teleports this body to the given center-of-mass transform.
    pub fn set_center_of_mass_transform(&mut self, transform: Isometry<Real>) {
        if self.is_static_or_kinematic() {
            self.interpolation_world_transform = self.world_transform;
        } else {
            self.interpolation_world_transform = transform;
        }
        self.interpolation_linvel = self.linvel;
        self.interpolation_angvel = self.angvel;
        self.world_transform = transform;
        self.update_inertia_tensor();
    }

    /// Moves this body to its newly integrated transform.
    #[inline]
    pub fn proceed_to_transform(&mut self, transform: Isometry<Real>) {
        self.set_center_of_mass_transform(transform);
    }

    /// Translates this body.
    pub fn translate(&mut self, translation: &Vector<Real>) {
        self.world_transform.translation.vector += translation;
    }

    /// The transform this body reaches after `dt` with its current velocities.
    pub fn predict_integrated_transform(&self, dt: Real) -> Isometry<Real> {
        utils::integrate_transform(&self.world_transform, &self.linvel, &self.angvel, dt)
    }

    /// Derives the velocities of a kinematic body from the motion of its motion state.
    pub fn save_kinematic_state(&mut self, dt: Real) {
        if dt != 0.0 {
            if let Some(state) = &self.motion_state {
                self.world_transform = state.world_transform();
            }

            let (linvel, angvel) =
                calculate_velocity(&self.interpolation_world_transform, &self.world_transform, dt);
            self.linvel = linvel;
            self.angvel = angvel;
            self.interpolation_linvel = linvel;
            self.interpolation_angvel = angvel;
            self.interpolation_world_transform = self.world_transform;
        }
    }

    /// Extrapolates the last simulated transform of this body by `dt`.
    pub fn extrapolated_transform(&self, dt: Real) -> Isometry<Real> {
        utils::integrate_transform(
            &self.interpolation_world_transform,
            &self.interpolation_linvel,
            &self.interpolation_angvel,
            dt,
        )
    }

    /// The linear velocity of this body's center of mass.
    #[inline]
    pub fn linvel(&self) -> &Vector<Real> {
        &self.linvel
    }

    /// The angular velocity of this body.
    #[inline]
    pub fn angvel(&self) -> &Vector<Real> {
        &self.angvel
    }

    /// Sets the linear velocity of this body.
    #[inline]
    pub fn set_linvel(&mut self, linvel: Vector<Real>) {
        self.linvel = linvel;
    }

    /// Sets the angular velocity of this body.
    #[inline]
    pub fn set_angvel(&mut self, angvel: Vector<Real>) {
        self.angvel = angvel;
    }

    /// The velocity of the point at `rel_pos` from the center of mass.
    #[inline]
    pub fn velocity_in_local_point(&self, rel_pos: &Vector<Real>) -> Vector<Real> {
        self.linvel + self.angvel.cross(rel_pos)
    }

    /*
     * Mass properties.
     */
    /// Sets the mass and principal inertia of this body.
    ///
    /// A zero mass makes the body static, with zero inverse mass and inverse inertia. Inertia
    /// axes set to zero are locked.
    pub fn set_mass_props(&mut self, mass: Real, inertia: &Vector<Real>) {
        if mass == 0.0 {
            self.collision_flags |= CollisionFlags::STATIC;
            self.inv_mass = 0.0;
            self.inv_inertia_local = Vector::zeros();
        } else {
            self.collision_flags &= !CollisionFlags::STATIC;
            self.inv_mass = 1.0 / mass;
            self.inv_inertia_local = inertia.map(|i| if i != 0.0 { 1.0 / i } else { 0.0 });
        }

        self.update_inertia_tensor();
    }

    /// The inverse mass of this body.
    #[inline]
    pub fn inv_mass(&self) -> Real {
        self.inv_mass
    }

    /// The inverse principal inertia of this body.
    #[inline]
    pub fn inv_inertia_local(&self) -> &Vector<Real> {
        &self.inv_inertia_local
    }

    /// Sets the inverse principal inertia of this body.
    pub fn set_inv_inertia_local(&mut self, inv_inertia: Vector<Real>) {
        self.inv_inertia_local = inv_inertia;
        self.update_inertia_tensor();
    }

    /// The world-space inverse inertia tensor of this body.
    #[inline]
    pub fn inv_inertia_tensor_world(&self) -> &Matrix<Real> {
        &self.inv_inertia_tensor_world
    }

    /// Recomputes the world-space inverse inertia tensor from the current orientation.
    pub fn update_inertia_tensor(&mut self) {
        let basis = utils::rotation_basis(&self.world_transform);
        self.inv_inertia_tensor_world =
            basis * Matrix::from_diagonal(&self.inv_inertia_local) * basis.transpose();
    }

    /// The shape of this body.
    #[inline]
    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    /// The world-space bounding box of this body's shape, as `(mins, maxs)`.
    pub fn aabb(&self) -> (Point<Real>, Point<Real>) {
        utils::aabb_from_support_map(self.shape.as_support_map(), &self.world_transform)
    }

    /*
     * Forces and impulses.
     */
    /// Sets the gravitational acceleration of this body. Ignored for static bodies.
    pub fn set_gravity(&mut self, acceleration: &Vector<Real>) {
        if self.inv_mass != 0.0 {
            self.gravity = acceleration * (1.0 / self.inv_mass);
        }
    }

    /// The gravitational acceleration of this body.
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity * self.inv_mass
    }

    /// Adds the gravity force to the forces applied to this body.
    pub fn apply_gravity(&mut self) {
        if !self.is_static_or_kinematic() {
            let gravity = self.gravity;
            self.apply_central_force(&gravity);
        }
    }

    /// Applies a force at the center of mass.
    #[inline]
    pub fn apply_central_force(&mut self, force: &Vector<Real>) {
        self.total_force += force;
    }

    /// Applies a torque.
    #[inline]
    pub fn apply_torque(&mut self, torque: &Vector<Real>) {
        self.total_torque += torque;
    }

    /// Applies a force at the point `rel_pos` from the center of mass.
    pub fn apply_force(&mut self, force: &Vector<Real>, rel_pos: &Vector<Real>) {
        self.apply_central_force(force);
        self.apply_torque(&rel_pos.cross(force));
    }

    /// Applies an impulse at the center of mass.
    #[inline]
    pub fn apply_central_impulse(&mut self, impulse: &Vector<Real>) {
        self.linvel += impulse * self.inv_mass;
    }

    /// Applies an angular impulse.
    #[inline]
    pub fn apply_torque_impulse(&mut self, torque: &Vector<Real>) {
        self.angvel += self.inv_inertia_tensor_world * torque;
    }

    /// Applies an impulse at the point `rel_pos` from the center of mass.
    pub fn apply_impulse(&mut self, impulse: &Vector<Real>, rel_pos: &Vector<Real>) {
        if self.inv_mass != 0.0 {
            self.apply_central_impulse(impulse);
            self.apply_torque_impulse(&rel_pos.cross(impulse));
        }
    }

    /// Applies precomputed linear and angular velocity changes, scaled by `magnitude`.
    pub fn internal_apply_impulse(
        &mut self,
        linear_component: &Vector<Real>,
        angular_component: &Vector<Real>,
        magnitude: Real,
    ) {
        if self.inv_mass != 0.0 {
            self.linvel += linear_component * magnitude;
            self.angvel += angular_component * magnitude;
        }
    }

    /// The sum of the forces applied since the last call to [`Self::clear_forces`].
    #[inline]
    pub fn total_force(&self) -> &Vector<Real> {
        &self.total_force
    }

    /// The sum of the torques applied since the last call to [`Self::clear_forces`].
    #[inline]
    pub fn total_torque(&self) -> &Vector<Real> {
        &self.total_torque
    }

    /// Resets the applied forces and torques.
    pub fn clear_forces(&mut self) {
        self.total_force = Vector::zeros();
        self.total_torque = Vector::zeros();
    }

    /// The inverse of the effective mass of this body along `normal`, at the world-space
    /// point `pos`.
    pub fn compute_impulse_denominator(&self, pos: &Point<Real>, normal: &Vector<Real>) -> Real {
        let r0 = pos - self.center_of_mass_position();
        let c0 = r0.cross(normal);
        let vec = (self.inv_inertia_tensor_world * c0).cross(&r0);
        self.inv_mass + normal.dot(&vec)
    }

    /// The inverse of the effective angular mass of this body around `axis`.
    pub fn compute_angular_impulse_denominator(&self, axis: &Vector<Real>) -> Real {
        axis.dot(&(self.inv_inertia_tensor_world * axis))
    }

    /*
     * Integration.
     */
    /// Integrates the applied forces into the velocities.
    ///
    /// The angular velocity is clamped so the body doesn't rotate by more than
    /// [`MAX_ANGVEL`] during `dt`.
    pub fn integrate_velocities(&mut self, dt: Real) {
        if self.is_static_or_kinematic() {
            return;
        }

        self.linvel += self.total_force * (self.inv_mass * dt);
        self.angvel += self.inv_inertia_tensor_world * self.total_torque * dt;

        let angvel = self.angvel.norm();
        if angvel * dt > MAX_ANGVEL {
            self.angvel *= (MAX_ANGVEL / dt) / angvel;
        }
    }

    /// Sets the damping coefficients, clamped to `[0, 1]`.
    pub fn set_damping(&mut self, linear_damping: Real, angular_damping: Real) {
        self.linear_damping = linear_damping.clamp(0.0, 1.0);
        self.angular_damping = angular_damping.clamp(0.0, 1.0);
    }

    /// The linear damping coefficient.
    pub fn linear_damping(&self) -> Real {
        self.linear_damping
    }

    /// The angular damping coefficient.
    pub fn angular_damping(&self) -> Real {
        self.angular_damping
    }

    /// Damps the velocities of this body for a step of length `dt`.
    pub fn apply_damping(&mut self, dt: Real) {
        self.linvel *= (1.0 - dt * self.linear_damping).clamp(0.0, 1.0);
        self.angvel *= (1.0 - dt * self.angular_damping).clamp(0.0, 1.0);

        if self.additional_damping {
            if self.angvel.norm_squared() < self.additional_angular_damping_threshold_sqr
                && self.linvel.norm_squared() < self.additional_linear_damping_threshold_sqr
            {
                self.angvel *= self.additional_damping_factor;
                self.linvel *= self.additional_damping_factor;
            }

            let speed = self.linvel.norm();
            if speed < self.linear_damping {
                if speed > ADDITIONAL_DAMPING_SNAP_SPEED {
                    self.linvel -= self.linvel * (ADDITIONAL_DAMPING_SNAP_SPEED / speed);
                } else {
                    self.linvel = Vector::zeros();
                }
            }

            let ang_speed = self.angvel.norm();
            if ang_speed < self.angular_damping {
                if ang_speed > ADDITIONAL_DAMPING_SNAP_SPEED {
                    self.angvel -= self.angvel * (ADDITIONAL_DAMPING_SNAP_SPEED / ang_speed);
                } else {
                    self.angvel = Vector::zeros();
                }
            }
        }
    }

    /*
     * Activation.
     */
    /// The activation state of this body.
    #[inline]
    pub fn activation_state(&self) -> ActivationState {
        self.activation_state
    }

    /// Sets the activation state, unless the current one is forced.
    pub fn set_activation_state(&mut self, state: ActivationState) {
        if !self.activation_state.is_forced() {
            self.activation_state = state;
        }
    }

    /// Sets the activation state, even if the current one is forced.
    pub fn force_activation_state(&mut self, state: ActivationState) {
        self.activation_state = state;
    }

    /// Wakes this body up. Static and kinematic bodies are only woken up if `force` is set.
    pub fn activate(&mut self, force: bool) {
        if force || !self.is_static_or_kinematic() {
            self.set_activation_state(ActivationState::Active);
            self.deactivation_time = 0.0;
        }
    }

    /// Is this body simulated?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.activation_state.is_active()
    }

    /// The time this body has been at rest.
    #[inline]
    pub fn deactivation_time(&self) -> Real {
        self.deactivation_time
    }

    /// The linear speed under which this body is considered at rest.
    pub fn linear_sleeping_threshold(&self) -> Real {
        self.linear_sleeping_threshold
    }

    /// The angular speed under which this body is considered at rest.
    pub fn angular_sleeping_threshold(&self) -> Real {
        self.angular_sleeping_threshold
    }

    /// Sets the speeds under which this body is considered at rest.
    pub fn set_sleeping_thresholds(&mut self, linear: Real, angular: Real) {
        self.linear_sleeping_threshold = linear;
        self.angular_sleeping_threshold = angular;
    }

    /// Accumulates the time this body has been at rest, or wakes it up if it moves.
    pub fn update_deactivation(&mut self, dt: Real) {
        if self.activation_state == ActivationState::IslandSleeping
            || self.activation_state == ActivationState::DisableDeactivation
        {
            return;
        }

        let lin_threshold = self.linear_sleeping_threshold;
        let ang_threshold = self.angular_sleeping_threshold;

        if self.linvel.norm_squared() < lin_threshold * lin_threshold
            && self.angvel.norm_squared() < ang_threshold * ang_threshold
        {
            self.deactivation_time += dt;
        } else {
            self.deactivation_time = 0.0;
            self.set_activation_state(ActivationState::Active);
        }
    }

    /// Has this body been at rest long enough to fall asleep?
    pub fn wants_sleeping(&self, deactivation_time: Real, disable_deactivation: bool) -> bool {
        if self.activation_state == ActivationState::DisableDeactivation {
            return false;
        }

        if disable_deactivation || deactivation_time == 0.0 {
            return false;
        }

        if self.activation_state == ActivationState::IslandSleeping
            || self.activation_state == ActivationState::WantsDeactivation
        {
            return true;
        }

        self.deactivation_time > deactivation_time
    }

    /*
     * Flags and material.
     */
    /// The collision flags of this body.
    #[inline]
    pub fn collision_flags(&self) -> CollisionFlags {
        self.collision_flags
    }

    /// Sets the collision flags of this body.
    pub fn set_collision_flags(&mut self, flags: CollisionFlags) {
        self.collision_flags = flags;
    }

    /// Is this body static?
    #[inline]
    pub fn is_static(&self) -> bool {
        self.collision_flags.contains(CollisionFlags::STATIC)
    }

    /// Is this body kinematic?
    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.collision_flags.contains(CollisionFlags::KINEMATIC)
    }

    /// Is this body either static or kinematic?
    #[inline]
    pub fn is_static_or_kinematic(&self) -> bool {
        self.collision_flags
            .intersects(CollisionFlags::STATIC | CollisionFlags::KINEMATIC)
    }

    /// Are the contacts involving this body solved?
    #[inline]
    pub fn has_contact_response(&self) -> bool {
        !self.collision_flags.contains(CollisionFlags::NO_CONTACT_RESPONSE)
    }

    /// Can this body connect two bodies into the same island?
    #[inline]
    pub fn merges_simulation_islands(&self) -> bool {
        !self.collision_flags.intersects(
            CollisionFlags::STATIC | CollisionFlags::KINEMATIC | CollisionFlags::NO_CONTACT_RESPONSE,
        )
    }

    /// The friction coefficient of this body.
    #[inline]
    pub fn friction(&self) -> Real {
        self.friction
    }

    /// Sets the friction coefficient of this body.
    pub fn set_friction(&mut self, friction: Real) {
        self.friction = friction;
    }

    /// The restitution coefficient of this body.
    #[inline]
    pub fn restitution(&self) -> Real {
        self.restitution
    }

    /// Sets the restitution coefficient of this body.
    pub fn set_restitution(&mut self, restitution: Real) {
        self.restitution = restitution;
    }

    /// The surface properties of this body.
    pub fn material(&self) -> ContactMaterial {
        ContactMaterial {
            friction: self.friction,
            restitution: self.restitution,
        }
    }

    /// The island this body belonged to during the last step, if it is dynamic.
    #[inline]
    pub fn island_tag(&self) -> Option<usize> {
        self.island_tag
    }

    /// The motion state of this body.
    pub fn motion_state(&self) -> Option<&dyn MotionState> {
        self.motion_state.as_deref()
    }

    /// The motion state of this body, mutably.
    pub fn motion_state_mut(&mut self) -> Option<&mut (dyn MotionState + 'static)> {
        self.motion_state.as_deref_mut()
    }

    /// Sets the motion state of this body.
    pub fn set_motion_state(&mut self, motion_state: Option<Box<dyn MotionState>>) {
        self.motion_state = motion_state;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn unit_ball(mass: Real) -> RigidBody {
        RigidBody::new(RigidBodyConstructionInfo::from_shape(
            mass,
            SharedShape::ball(0.5),
        ))
    }

    #[test]
    fn static_body_ignores_forces() {
        let mut body = unit_ball(0.0);
        assert!(body.is_static());
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(*body.inv_inertia_local(), Vector::zeros());

        body.apply_central_force(&Vector::new(100.0, 0.0, 0.0));
        body.apply_torque(&Vector::new(0.0, 100.0, 0.0));
        body.integrate_velocities(1.0);
        assert_eq!(*body.linvel(), Vector::zeros());
        assert_eq!(*body.angvel(), Vector::zeros());
    }

    #[test]
    fn force_integration() {
        let mut body = unit_ball(2.0);
        body.apply_central_force(&Vector::new(4.0, 0.0, 0.0));
        body.integrate_velocities(0.5);
        assert_relative_eq!(*body.linvel(), Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn angular_velocity_is_clamped() {
        let mut body = unit_ball(1.0);
        body.apply_torque(&Vector::new(0.0, 0.0, 1.0e6));
        body.integrate_velocities(0.1);
        assert_relative_eq!(body.angvel().norm() * 0.1, MAX_ANGVEL, epsilon = 1.0e-4);
    }

    #[test]
    fn locked_axis_has_zero_inverse_inertia() {
        let mut body = unit_ball(1.0);
        body.set_mass_props(1.0, &Vector::new(1.0, 0.0, 2.0));
        assert_eq!(*body.inv_inertia_local(), Vector::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn new_mass_props_update_world_inertia() {
        let mut body = unit_ball(1.0);
        let rot = Vector::z() * core::f32::consts::FRAC_PI_2;
        body.set_center_of_mass_transform(Isometry::new(Vector::zeros(), rot));
        body.set_mass_props(2.0, &Vector::new(1.0, 2.0, 4.0));

        // A quarter turn around `z` swaps the local `x` and `y` axes.
        let expected = Matrix::from_diagonal(&Vector::new(0.5, 1.0, 0.25));
        assert_relative_eq!(*body.inv_inertia_tensor_world(), expected, epsilon = 1.0e-6);

        body.set_mass_props(0.0, &Vector::zeros());
        assert_eq!(*body.inv_inertia_tensor_world(), Matrix::zeros());
    }

    #[test]
    fn damping_scales_velocities() {
        let mut body = unit_ball(1.0);
        body.set_damping(0.5, 0.2);
        body.set_linvel(Vector::new(10.0, 0.0, 0.0));
        body.set_angvel(Vector::new(0.0, 10.0, 0.0));
        body.apply_damping(1.0);
        assert_relative_eq!(body.linvel().x, 5.0);
        assert_relative_eq!(body.angvel().y, 8.0);
    }

    #[test]
    fn additional_damping_snaps_slow_bodies() {
        let mut info = RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.5));
        info.additional_damping = true;
        info.linear_damping = 0.5;
        let mut body = RigidBody::new(info);
        body.set_linvel(Vector::new(0.004, 0.0, 0.0));
        body.apply_damping(0.01);
        assert_eq!(*body.linvel(), Vector::zeros());
    }

    #[test]
    fn deactivation_timer() {
        let mut body = unit_ball(1.0);
        for _ in 0..10 {
            body.update_deactivation(0.5);
        }
        assert!(body.wants_sleeping(2.0, false));
        assert!(!body.wants_sleeping(2.0, true));
        assert!(!body.wants_sleeping(0.0, false));

        body.set_linvel(Vector::new(5.0, 0.0, 0.0));
        body.update_deactivation(0.5);
        assert_eq!(body.deactivation_time(), 0.0);
        assert!(!body.wants_sleeping(2.0, false));
    }

    #[test]
    fn forced_states_are_kept() {
        let mut body = unit_ball(1.0);
        body.force_activation_state(ActivationState::DisableDeactivation);
        body.set_activation_state(ActivationState::IslandSleeping);
        assert_eq!(body.activation_state(), ActivationState::DisableDeactivation);
        assert!(!body.wants_sleeping(2.0, false));
    }

    #[test]
    fn impulse_at_point() {
        let mut body = unit_ball(1.0);
        body.apply_impulse(&Vector::new(0.0, 1.0, 0.0), &Vector::new(1.0, 0.0, 0.0));
        assert_relative_eq!(*body.linvel(), Vector::new(0.0, 1.0, 0.0));
        assert!(body.angvel().z > 0.0);

        // A unit ball has an impulse denominator of `1 / m` at its center.
        let denom = body.compute_impulse_denominator(&Point::origin(), &Vector::x());
        assert_relative_eq!(denom, 1.0);
    }

    #[test]
    fn kinematic_velocity_from_motion() {
        let mut body = unit_ball(0.0);
        body.set_collision_flags(body.collision_flags() | CollisionFlags::KINEMATIC);
        body.set_center_of_mass_transform(Isometry::translation(1.0, 0.0, 0.0));
        // Static and kinematic bodies keep their previous interpolation transform.
        body.save_kinematic_state(0.5);
        assert_relative_eq!(*body.linvel(), Vector::new(2.0, 0.0, 0.0));
    }
}
