use carom3d::dynamics::{
    ActivationState, DiscreteDynamicsWorld, RigidBody, RigidBodyConstructionInfo,
};
use carom3d::math::{Isometry, Point, Vector};
use carom3d::shape::SharedShape;

const DT: f32 = 1.0 / 60.0;

#[test]
fn resting_body_falls_asleep() {
    let mut world = DiscreteDynamicsWorld::default();
    let handle = world.add_rigid_body(RigidBody::new(RigidBodyConstructionInfo::from_shape(
        1.0,
        SharedShape::ball(0.5),
    )));

    // Two seconds at rest is not enough yet.
    for _ in 0..100 {
        let _ = world.step_simulation(DT, 1, DT);
    }
    assert!(world.bodies()[handle].is_active());

    for _ in 0..60 {
        let _ = world.step_simulation(DT, 1, DT);
    }
    assert_eq!(
        world.bodies()[handle].activation_state(),
        ActivationState::IslandSleeping
    );

    world.bodies_mut()[handle].activate(false);
    assert_eq!(world.bodies()[handle].activation_state(), ActivationState::Active);
    assert_eq!(world.bodies()[handle].deactivation_time(), 0.0);
}

#[test]
fn disabled_deactivation_keeps_bodies_awake() {
    let mut world = DiscreteDynamicsWorld::default();
    let handle = world.add_rigid_body(RigidBody::new(RigidBodyConstructionInfo::from_shape(
        1.0,
        SharedShape::ball(0.5),
    )));
    world.bodies_mut()[handle].force_activation_state(ActivationState::DisableDeactivation);

    for _ in 0..300 {
        let _ = world.step_simulation(DT, 1, DT);
    }

    assert_eq!(
        world.bodies()[handle].activation_state(),
        ActivationState::DisableDeactivation
    );

    // Forced states are not overridden.
    world.bodies_mut()[handle].set_activation_state(ActivationState::IslandSleeping);
    assert_eq!(
        world.bodies()[handle].activation_state(),
        ActivationState::DisableDeactivation
    );
}

#[test]
fn ball_settles_on_the_ground() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let ground = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(0.0, SharedShape::cuboid(10.0, 0.5, 10.0))
            .with_transform(Isometry::translation(0.0, -0.5, 0.0)),
    ));
    let ball = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.5))
            .with_transform(Isometry::translation(0.0, 0.6, 0.0)),
    ));

    for _ in 0..600 {
        let _ = world.step_simulation(DT, 1, DT);
    }

    let bodies = world.bodies();
    assert!(bodies[ball].center_of_mass_position().y > 0.3);
    assert!(bodies[ball].center_of_mass_position().y < 0.7);
    assert_eq!(bodies[ball].activation_state(), ActivationState::IslandSleeping);
    assert_relative_eq!(bodies[ground].center_of_mass_position().y, -0.5);
}

#[test]
fn static_bodies_are_not_integrated() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let mut body = RigidBody::new(RigidBodyConstructionInfo::from_shape(
        0.0,
        SharedShape::cuboid(1.0, 1.0, 1.0),
    ));
    assert!(body.is_static());
    assert_eq!(body.inv_mass(), 0.0);
    assert_eq!(*body.inv_inertia_local(), Vector::zeros());

    body.set_linvel(Vector::new(1.0, 2.0, 3.0));
    body.apply_central_force(&Vector::new(0.0, 100.0, 0.0));
    body.integrate_velocities(DT);
    assert_eq!(*body.linvel(), Vector::new(1.0, 2.0, 3.0));
    body.clear_forces();
    body.set_linvel(Vector::zeros());

    let handle = world.add_rigid_body(body);
    assert_eq!(world.bodies()[handle].gravity(), Vector::zeros());

    for _ in 0..10 {
        let _ = world.step_simulation(DT, 1, DT);
    }
    assert_eq!(world.bodies()[handle].center_of_mass_position(), Point::origin());
}
