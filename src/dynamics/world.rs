use crate::dynamics::constraint::constraint_island_id;
use crate::dynamics::solver::{ConstraintSolver, SequentialImpulseConstraintSolver};
use crate::dynamics::{
    ActivationState, BruteForceDispatcher, CollisionDispatcher, ConstraintHandle,
    DebugDrawModes, DebugRenderBackend, IntegrationParameters, ManifoldSet, RigidBody,
    RigidBodyHandle, RigidBodySet, SimulationIslandManager, TypedConstraint, WorldError,
};
use crate::math::{Point, Real, Vector};
use crate::utils;
use crate::vehicle::{RaycastVehicle, VehicleHandle};
use alloc::boxed::Box;
use alloc::vec::Vec;
use slab::Slab;

/// A rigid-body dynamics world advancing with fixed sub-steps.
///
/// Each sub-step predicts the unconstrained motion of the awake bodies, updates the contact
/// manifolds through the [`CollisionDispatcher`], groups the bodies into islands, solves the
/// contacts and joints of each island, integrates the transforms, updates the vehicles, and
/// finally updates the sleep state of every body.
pub struct DiscreteDynamicsWorld {
    gravity: Vector<Real>,
    bodies: RigidBodySet,
    manifolds: ManifoldSet,
    constraints: Slab<Box<dyn TypedConstraint>>,
    vehicles: Slab<RaycastVehicle>,
    island_manager: SimulationIslandManager,
    solver: Box<dyn ConstraintSolver>,
    dispatcher: Box<dyn CollisionDispatcher>,
    params: IntegrationParameters,
    local_time: Real,
}

impl Default for DiscreteDynamicsWorld {
    fn default() -> Self {
        Self::new(
            Box::new(BruteForceDispatcher::new()),
            Box::new(SequentialImpulseConstraintSolver::new()),
        )
    }
}

impl core::fmt::Debug for DiscreteDynamicsWorld {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DiscreteDynamicsWorld")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies)
            .field("manifolds", &self.manifolds)
            .field("num_constraints", &self.constraints.len())
            .field("vehicles", &self.vehicles)
            .field("params", &self.params)
            .field("local_time", &self.local_time)
            .finish()
    }
}

impl DiscreteDynamicsWorld {
    /// Creates an empty world without gravity.
    pub fn new(dispatcher: Box<dyn CollisionDispatcher>, solver: Box<dyn ConstraintSolver>) -> Self {
        Self::with_parameters(dispatcher, solver, IntegrationParameters::default())
    }

    /// Creates an empty world without gravity, with the given integration parameters.
    pub fn with_parameters(
        dispatcher: Box<dyn CollisionDispatcher>,
        solver: Box<dyn ConstraintSolver>,
        params: IntegrationParameters,
    ) -> Self {
        let mut manifolds = ManifoldSet::new();
        manifolds.set_contact_breaking_threshold(params.contact_breaking_threshold);

        Self {
            gravity: Vector::zeros(),
            bodies: RigidBodySet::new(),
            manifolds,
            constraints: Slab::new(),
            vehicles: Slab::new(),
            island_manager: SimulationIslandManager::new(),
            solver,
            dispatcher,
            params,
            local_time: 0.0,
        }
    }

    /*
     * Accessors.
     */
    /// The rigid bodies of this world.
    #[inline]
    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    /// The rigid bodies of this world, mutably.
    ///
    /// Bodies must be added and removed with [`Self::add_rigid_body`] and
    /// [`Self::remove_rigid_body`].
    #[inline]
    pub fn bodies_mut(&mut self) -> &mut RigidBodySet {
        &mut self.bodies
    }

    /// The persistent manifolds of the body pairs in contact.
    #[inline]
    pub fn manifolds(&self) -> &ManifoldSet {
        &self.manifolds
    }

    /// The persistent manifolds, mutably.
    #[inline]
    pub fn manifolds_mut(&mut self) -> &mut ManifoldSet {
        &mut self.manifolds
    }

    /// The integration parameters.
    #[inline]
    pub fn params(&self) -> &IntegrationParameters {
        &self.params
    }

    /// The integration parameters, mutably.
    #[inline]
    pub fn params_mut(&mut self) -> &mut IntegrationParameters {
        &mut self.params
    }

    /// The island manager.
    #[inline]
    pub fn island_manager(&self) -> &SimulationIslandManager {
        &self.island_manager
    }

    /// The time accumulated since the last fixed sub-step.
    #[inline]
    pub fn local_time(&self) -> Real {
        self.local_time
    }

    /// The gravity applied to the dynamic bodies.
    #[inline]
    pub fn gravity(&self) -> &Vector<Real> {
        &self.gravity
    }

    /// Sets the gravity of this world and of all its dynamic bodies.
    pub fn set_gravity(&mut self, gravity: Vector<Real>) {
        self.gravity = gravity;
        for (_, body) in self.bodies.iter_mut() {
            body.set_gravity(&gravity);
        }
    }

    /// Replaces the constraint solver.
    pub fn set_constraint_solver(&mut self, solver: Box<dyn ConstraintSolver>) {
        self.solver = solver;
    }

    /// Replaces the collision dispatcher.
    pub fn set_dispatcher(&mut self, dispatcher: Box<dyn CollisionDispatcher>) {
        self.dispatcher = dispatcher;
    }

    /*
     * Bodies, constraints and vehicles.
     */
    /// Adds a rigid body to this world. Dynamic bodies receive the gravity of the world.
    pub fn add_rigid_body(&mut self, mut body: RigidBody) -> RigidBodyHandle {
        if !body.is_static_or_kinematic() {
            body.set_gravity(&self.gravity);
        }
        self.bodies.insert(body)
    }

    /// Removes a rigid body, along with its manifolds, the constraints attached to it, and the
    /// vehicles it is the chassis of.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        let body = self.bodies.remove(handle)?;
        self.manifolds.release_body_manifolds(handle);
        self.constraints
            .retain(|_, c| c.body_a() != handle && c.body_b() != Some(handle));
        self.vehicles.retain(|_, v| v.chassis() != handle);
        Some(body)
    }

    /// Adds a joint between bodies of this world.
    pub fn add_constraint(
        &mut self,
        constraint: Box<dyn TypedConstraint>,
    ) -> Result<ConstraintHandle, WorldError> {
        let body_a = constraint.body_a();
        if !self.bodies.contains(body_a) {
            return Err(WorldError::UnknownBody(body_a));
        }

        if let Some(body_b) = constraint.body_b() {
            if !self.bodies.contains(body_b) {
                return Err(WorldError::UnknownBody(body_b));
            }
            if body_a == body_b {
                return Err(WorldError::SelfConstraint(body_a));
            }
        }

        Ok(ConstraintHandle(self.constraints.insert(constraint)))
    }

    /// Removes a joint.
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Option<Box<dyn TypedConstraint>> {
        self.constraints.try_remove(handle.0)
    }

    /// The joint with the given handle.
    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&dyn TypedConstraint> {
        self.constraints.get(handle.0).map(|c| &**c)
    }

    /// The joint with the given handle, mutably.
    pub fn constraint_mut(&mut self, handle: ConstraintHandle) -> Option<&mut dyn TypedConstraint> {
        self.constraints.get_mut(handle.0).map(|c| &mut **c as &mut dyn TypedConstraint)
    }

    /// The number of joints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Adds a vehicle whose chassis is a dynamic body of this world.
    pub fn add_vehicle(&mut self, vehicle: RaycastVehicle) -> Result<VehicleHandle, WorldError> {
        let chassis = vehicle.chassis();
        let body = self
            .bodies
            .get(chassis)
            .ok_or(WorldError::UnknownBody(chassis))?;

        if body.is_static_or_kinematic() {
            return Err(WorldError::StaticChassis(chassis));
        }

        Ok(VehicleHandle(self.vehicles.insert(vehicle)))
    }

    /// Removes a vehicle. Its chassis stays in the world.
    pub fn remove_vehicle(&mut self, handle: VehicleHandle) -> Option<RaycastVehicle> {
        self.vehicles.try_remove(handle.0)
    }

    /// The vehicle with the given handle.
    pub fn vehicle(&self, handle: VehicleHandle) -> Option<&RaycastVehicle> {
        self.vehicles.get(handle.0)
    }

    /// The vehicle with the given handle, mutably.
    pub fn vehicle_mut(&mut self, handle: VehicleHandle) -> Option<&mut RaycastVehicle> {
        self.vehicles.get_mut(handle.0)
    }

    /// The vehicle with the given handle together with the bodies, so that wheels can be added
    /// to it.
    pub fn vehicle_and_bodies_mut(
        &mut self,
        handle: VehicleHandle,
    ) -> Option<(&mut RaycastVehicle, &RigidBodySet)> {
        self.vehicles.get_mut(handle.0).map(|v| (v, &self.bodies))
    }

    /*
     * Stepping.
     */
    /// Advances the simulation by `time_step`.
    ///
    /// The elapsed time is accumulated and consumed by sub-steps of length `fixed_time_step`,
    /// with at most `max_sub_steps` of them per call; the leftover time is used to
    /// interpolate the transforms given to the motion states. If `max_sub_steps` is zero, a
    /// single sub-step of length `time_step` is performed instead, without interpolation.
    ///
    /// Returns the number of sub-steps performed.
    pub fn step_simulation(
        &mut self,
        time_step: Real,
        max_sub_steps: usize,
        fixed_time_step: Real,
    ) -> usize {
        let (num_sub_steps, sub_step, max_sub_steps) = if max_sub_steps != 0 {
            self.local_time += time_step;
            let mut num_sub_steps = 0;
            if fixed_time_step > 0.0 {
                // Accept a few ulps of error so that `k * fixed_time_step` yields `k` steps.
                let ratio = self.local_time / fixed_time_step;
                let tolerance = ratio.abs().max(1.0) * Real::EPSILON * 8.0;
                num_sub_steps = (ratio + tolerance).floor().max(0.0) as usize;
                self.local_time =
                    (self.local_time - num_sub_steps as Real * fixed_time_step).max(0.0);
            }
            (num_sub_steps, fixed_time_step, max_sub_steps)
        } else {
            self.local_time = 0.0;
            let num_sub_steps = if time_step.abs() < Real::EPSILON { 0 } else { 1 };
            (num_sub_steps, time_step, 1)
        };

        if self.manifolds.contact_breaking_threshold() != self.params.contact_breaking_threshold {
            self.manifolds
                .set_contact_breaking_threshold(self.params.contact_breaking_threshold);
        }

        let clamped_sub_steps = num_sub_steps.min(max_sub_steps);
        if clamped_sub_steps < num_sub_steps {
            log::warn!(
                "Simulation is falling behind: clamped {} sub-steps to {}.",
                num_sub_steps,
                clamped_sub_steps
            );
        }

        if clamped_sub_steps > 0 {
            self.save_kinematic_state(sub_step * clamped_sub_steps as Real);
            self.apply_gravity();

            for _ in 0..clamped_sub_steps {
                self.internal_single_step_simulation(sub_step);
            }
        }

        self.synchronize_motion_states();
        self.clear_forces();

        clamped_sub_steps
    }

    /// Performs a single sub-step of length `dt`.
    fn internal_single_step_simulation(&mut self, dt: Real) {
        self.predict_unconstrained_motion(dt);
        self.dispatcher
            .dispatch_all_collision_pairs(&self.bodies, &mut self.manifolds, &self.params);
        self.calculate_simulation_islands();
        self.solve_constraints(dt);
        self.integrate_transforms(dt);
        self.update_vehicles(dt);
        self.update_activation_state(dt);
    }

    fn save_kinematic_state(&mut self, dt: Real) {
        for (_, body) in self.bodies.iter_mut() {
            if body.is_kinematic() && body.activation_state() != ActivationState::IslandSleeping {
                body.save_kinematic_state(dt);
            }
        }
    }

    fn apply_gravity(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            if body.is_active() {
                body.apply_gravity();
            }
        }
    }

    fn predict_unconstrained_motion(&mut self, dt: Real) {
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_static_or_kinematic() && body.is_active() {
                body.integrate_velocities(dt);
                body.apply_damping(dt);
                body.interpolation_world_transform = body.predict_integrated_transform(dt);
            }
        }
    }

    fn calculate_simulation_islands(&mut self) {
        self.island_manager
            .update_activation_state(&mut self.bodies, &self.manifolds);

        for (_, constraint) in self.constraints.iter() {
            let Some(handle_b) = constraint.body_b() else {
                continue;
            };
            let handle_a = constraint.body_a();

            if let (Some(a), Some(b)) = (self.bodies.get(handle_a), self.bodies.get(handle_b)) {
                if !a.is_static_or_kinematic()
                    && !b.is_static_or_kinematic()
                    && (a.is_active() || b.is_active())
                {
                    self.island_manager
                        .unite_bodies(&self.bodies, handle_a, handle_b);
                }
            }
        }

        self.island_manager
            .store_island_activation_state(&mut self.bodies);
    }

    fn solve_constraints(&mut self, dt: Real) {
        let mut tagged: Vec<_> = self
            .constraints
            .iter_mut()
            .map(|(_, c)| (constraint_island_id(&**c, &self.bodies), c))
            .collect();
        tagged.sort_by_key(|(island_id, _)| *island_id);

        let mut island_ids = Vec::with_capacity(tagged.len());
        let mut constraints: Vec<&mut dyn TypedConstraint> = Vec::with_capacity(tagged.len());
        for (island_id, constraint) in tagged {
            island_ids.push(island_id);
            constraints.push(&mut **constraint);
        }

        let solver = &mut self.solver;
        let params = &self.params;
        solver.prepare_solve(self.bodies.len(), self.manifolds.len());

        self.island_manager.build_and_process_islands(
            &mut self.bodies,
            &mut self.manifolds,
            params.split_islands,
            |bodies, _, manifolds, island_id| {
                let range = match island_id {
                    Some(id) => {
                        island_ids.partition_point(|i| *i < Some(id))
                            ..island_ids.partition_point(|i| *i <= Some(id))
                    }
                    None => 0..constraints.len(),
                };

                let residual =
                    solver.solve_group(bodies, manifolds, &mut constraints[range], params, dt);
                log::trace!("Island {:?} solved with residual {}.", island_id, residual);
            },
        );

        solver.all_solved();
    }

    fn integrate_transforms(&mut self, dt: Real) {
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_static_or_kinematic() && body.is_active() {
                let predicted = body.predict_integrated_transform(dt);
                body.proceed_to_transform(predicted);
            }
        }
    }

    fn update_vehicles(&mut self, dt: Real) {
        for (_, vehicle) in self.vehicles.iter_mut() {
            vehicle.update_vehicle(&mut self.bodies, dt);
        }
    }

    fn update_activation_state(&mut self, dt: Real) {
        let deactivation_time = self.params.deactivation_time;
        let disable_deactivation = self.params.disable_deactivation;

        for (_, body) in self.bodies.iter_mut() {
            body.update_deactivation(dt);

            if body.wants_sleeping(deactivation_time, disable_deactivation) {
                if body.is_static_or_kinematic() {
                    body.set_activation_state(ActivationState::IslandSleeping);
                } else {
                    if body.activation_state() == ActivationState::Active {
                        body.set_activation_state(ActivationState::WantsDeactivation);
                    }
                    if body.activation_state() == ActivationState::IslandSleeping {
                        body.set_linvel(Vector::zeros());
                        body.set_angvel(Vector::zeros());
                    }
                }
            } else if body.activation_state() != ActivationState::DisableDeactivation {
                body.set_activation_state(ActivationState::Active);
            }
        }
    }

    /// Pushes the transforms of the awake dynamic bodies to their motion states, extrapolated
    /// by the time left over by the last fixed sub-step.
    pub fn synchronize_motion_states(&mut self) {
        let local_time = self.local_time;

        for (_, body) in self.bodies.iter_mut() {
            if body.is_static_or_kinematic()
                || body.activation_state() == ActivationState::IslandSleeping
            {
                continue;
            }

            let transform = body.extrapolated_transform(local_time);
            if let Some(state) = body.motion_state_mut() {
                state.set_world_transform(&transform);
            }
        }
    }

    /// Clears the forces applied to all the bodies.
    pub fn clear_forces(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.clear_forces();
        }
    }

    /*
     * Debug rendering.
     */
    /// Draws the contact points, bounding boxes, body frames, activation states and vehicles
    /// selected by the debug mode of `backend`.
    pub fn debug_draw_world(&self, backend: &mut dyn DebugRenderBackend) {
        let mode = backend.debug_mode();

        if mode.contains(DebugDrawModes::DRAW_CONTACT_POINTS) {
            for (_, manifold) in self.manifolds.iter() {
                for point in manifold.points() {
                    backend.draw_contact_point(
                        &point.position_world_on_b,
                        &point.normal_world_on_b,
                        point.distance,
                        point.lifetime,
                        &Vector::zeros(),
                    );
                }
            }
        }

        if mode.intersects(
            DebugDrawModes::DRAW_WIREFRAME | DebugDrawModes::DRAW_AABB | DebugDrawModes::DRAW_TEXT,
        ) {
            for (_, body) in self.bodies.iter() {
                if mode.contains(DebugDrawModes::DRAW_WIREFRAME) {
                    let origin: Point<Real> = body.center_of_mass_position();
                    let basis = utils::rotation_basis(body.center_of_mass_transform());
                    for i in 0..3 {
                        let mut color = Vector::zeros();
                        color[i] = 1.0;
                        backend.draw_line(&origin, &(origin + basis.column(i).into_owned()), &color);
                    }
                }

                if mode.contains(DebugDrawModes::DRAW_AABB) {
                    let (mins, maxs) = body.aabb();
                    backend.draw_aabb(&mins, &maxs, &Vector::x());
                }

                if mode.contains(DebugDrawModes::DRAW_TEXT) {
                    let text = alloc::format!("{:?}", body.activation_state());
                    backend.draw_3d_text(&body.center_of_mass_position(), &text);
                }
            }

            if mode.contains(DebugDrawModes::DRAW_WIREFRAME) {
                for (_, vehicle) in self.vehicles.iter() {
                    vehicle.debug_draw(backend);
                }
            }
        }
    }
}
