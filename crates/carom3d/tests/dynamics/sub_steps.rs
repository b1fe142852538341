use carom3d::dynamics::{DefaultMotionState, DiscreteDynamicsWorld, RigidBody, RigidBodyConstructionInfo};
use carom3d::math::{Isometry, Real, Vector};
use carom3d::shape::SharedShape;

#[test]
fn sub_steps_are_clamped() {
    let mut world = DiscreteDynamicsWorld::default();
    assert_eq!(world.step_simulation(1.0, 2, 0.25), 2);
    assert_relative_eq!(world.local_time(), 0.0);

    let mut world = DiscreteDynamicsWorld::default();
    assert_eq!(world.step_simulation(1.0, 10, 0.25), 4);
    assert_relative_eq!(world.local_time(), 0.0);
}

#[test]
fn whole_multiples_of_non_dyadic_steps() {
    for fixed in [1.0 / 60.0, 1.0 / 120.0, 0.01, 0.1, 1.0 / 30.0] {
        for k in 1..=20usize {
            let mut world = DiscreteDynamicsWorld::default();
            assert_eq!(
                world.step_simulation(k as Real * fixed, 100, fixed),
                k,
                "fixed = {fixed}, k = {k}"
            );
            assert!(world.local_time() >= 0.0);
            assert!(world.local_time() < fixed);
        }
    }
}

#[test]
fn one_frame_per_fixed_step_never_falls_behind() {
    let fixed = 1.0 / 60.0;
    let mut world = DiscreteDynamicsWorld::default();

    for _ in 0..600 {
        assert_eq!(world.step_simulation(fixed, 1, fixed), 1);
    }
}

#[test]
fn leftover_time_is_accumulated() {
    let mut world = DiscreteDynamicsWorld::default();
    assert_eq!(world.step_simulation(0.1, 1, 0.25), 0);
    assert_relative_eq!(world.local_time(), 0.1);
    assert_eq!(world.step_simulation(0.2, 1, 0.25), 1);
    assert_relative_eq!(world.local_time(), 0.05, epsilon = 1.0e-6);
}

#[test]
fn variable_time_step() {
    let mut world = DiscreteDynamicsWorld::default();
    assert_eq!(world.step_simulation(0.1, 0, 0.25), 1);
    assert_relative_eq!(world.local_time(), 0.0);
    assert_eq!(world.step_simulation(0.0, 0, 0.25), 0);
}

#[test]
fn motion_states_are_interpolated() {
    let mut world = DiscreteDynamicsWorld::default();
    let mut body = RigidBody::new(
        RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.5))
            .with_motion_state(Box::new(DefaultMotionState::new(Isometry::identity()))),
    );
    body.set_linvel(Vector::new(1.0, 0.0, 0.0));
    let handle = world.add_rigid_body(body);

    assert_eq!(world.step_simulation(0.25, 1, 0.25), 1);
    let body = &world.bodies()[handle];
    assert_relative_eq!(body.center_of_mass_position().x, 0.25, epsilon = 1.0e-5);
    let graphics = body.motion_state().unwrap().world_transform();
    assert_relative_eq!(graphics.translation.vector.x, 0.25, epsilon = 1.0e-5);

    // No sub-step: only the graphics transform moves forward.
    assert_eq!(world.step_simulation(0.1, 1, 0.25), 0);
    let body = &world.bodies()[handle];
    assert_relative_eq!(body.center_of_mass_position().x, 0.25, epsilon = 1.0e-5);
    let graphics = body.motion_state().unwrap().world_transform();
    assert_relative_eq!(graphics.translation.vector.x, 0.35, epsilon = 1.0e-5);
}
