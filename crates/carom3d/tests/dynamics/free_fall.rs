use carom3d::dynamics::{DiscreteDynamicsWorld, RigidBody, RigidBodyConstructionInfo};
use carom3d::math::{Isometry, Vector};
use carom3d::shape::SharedShape;

#[test]
fn free_fall_follows_symplectic_euler() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let handle = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.5))
            .with_transform(Isometry::identity()),
    ));

    let dt = 1.0 / 60.0;
    let mut expected_y = 0.0;
    for k in 1..=60 {
        assert_eq!(world.step_simulation(dt, 1, dt), 1);
        expected_y -= k as f32 * 10.0 * dt * dt;
    }

    let body = &world.bodies()[handle];
    assert_relative_eq!(body.linvel().y, -10.0, epsilon = 1.0e-3);
    assert_relative_eq!(body.center_of_mass_position().y, expected_y, epsilon = 1.0e-3);
    assert_relative_eq!(expected_y, -5.0833, epsilon = 1.0e-3);
    assert_relative_eq!(body.center_of_mass_position().x, 0.0);
    assert_relative_eq!(body.center_of_mass_position().z, 0.0);
}

#[test]
fn gravity_scales_with_mass() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -9.81, 0.0));

    let light = world.add_rigid_body(RigidBody::new(RigidBodyConstructionInfo::from_shape(
        1.0,
        SharedShape::ball(0.5),
    )));
    let heavy = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(50.0, SharedShape::cuboid(0.5, 0.5, 0.5))
            .with_transform(Isometry::translation(10.0, 0.0, 0.0)),
    ));

    for _ in 0..30 {
        let _ = world.step_simulation(1.0 / 60.0, 1, 1.0 / 60.0);
    }

    let bodies = world.bodies();
    assert_relative_eq!(bodies[light].linvel(), bodies[heavy].linvel(), epsilon = 1.0e-4);
    assert_relative_eq!(bodies[heavy].gravity(), Vector::new(0.0, -9.81, 0.0), epsilon = 1.0e-4);
}
