use carom3d::dynamics::{
    DiscreteDynamicsWorld, Point2PointConstraint, RigidBody, RigidBodyConstructionInfo,
    RigidBodyHandle, TypedConstraint, WorldError,
};
use carom3d::math::{Isometry, Point, Vector};
use carom3d::shape::SharedShape;

fn ball_at(x: f32, y: f32) -> RigidBody {
    RigidBody::new(
        RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.2))
            .with_transform(Isometry::translation(x, y, 0.0)),
    )
}

#[test]
fn invalid_constraints_are_rejected() {
    let mut world = DiscreteDynamicsWorld::default();
    let a = world.add_rigid_body(ball_at(0.0, 0.0));
    let unknown = RigidBodyHandle::from_raw_parts(42);

    let joint = Point2PointConstraint::new(a, unknown, Point::origin(), Point::origin());
    assert_eq!(
        world.add_constraint(Box::new(joint)).err(),
        Some(WorldError::UnknownBody(unknown))
    );

    let joint = Point2PointConstraint::new(a, a, Point::origin(), Point::origin());
    assert_eq!(
        world.add_constraint(Box::new(joint)).err(),
        Some(WorldError::SelfConstraint(a))
    );
    assert_eq!(world.num_constraints(), 0);
}

#[test]
fn pendulum_keeps_its_length() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let mut body = ball_at(0.0, -1.0);
    body.set_linvel(Vector::new(3.0, 0.0, 0.0));
    let handle = world.add_rigid_body(body);

    let joint = Point2PointConstraint::new_single(
        &world.bodies()[handle],
        handle,
        Point::new(0.0, 1.0, 0.0),
    );
    let joint_handle = world.add_constraint(Box::new(joint)).unwrap();

    for _ in 0..240 {
        let _ = world.step_simulation(1.0 / 60.0, 1, 1.0 / 60.0);
        let dist = world.bodies()[handle].center_of_mass_position().coords.norm();
        assert!((dist - 1.0).abs() < 0.1, "pendulum length drifted to {}", dist);
    }

    let joint = world
        .constraint(joint_handle)
        .and_then(|c| c.downcast_ref::<Point2PointConstraint>())
        .unwrap();
    assert_eq!(*joint.pivot_in_a(), Point::new(0.0, 1.0, 0.0));
    assert_eq!(joint.body_b(), None);
}

#[test]
fn chained_bodies_stay_attached() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let top = world.add_rigid_body(ball_at(0.0, 0.0));
    let bottom = world.add_rigid_body(ball_at(0.0, -1.0));

    let anchor = Point2PointConstraint::new_single(&world.bodies()[top], top, Point::origin());
    let link = Point2PointConstraint::new(
        top,
        bottom,
        Point::new(0.0, -0.5, 0.0),
        Point::new(0.0, 0.5, 0.0),
    );
    let _ = world.add_constraint(Box::new(anchor)).unwrap();
    let _ = world.add_constraint(Box::new(link)).unwrap();

    for _ in 0..120 {
        let _ = world.step_simulation(1.0 / 60.0, 1, 1.0 / 60.0);
    }

    let bodies = world.bodies();
    let top_pos = bodies[top].center_of_mass_position();
    let bottom_pos = bodies[bottom].center_of_mass_position();
    assert!(top_pos.coords.norm() < 0.1);
    assert!(((bottom_pos - top_pos).norm() - 1.0).abs() < 0.1);
    assert!(bottom_pos.y < top_pos.y);

    // Removing a body removes the joints attached to it.
    let _ = world.remove_rigid_body(bottom);
    assert_eq!(world.num_constraints(), 1);
    let _ = world.remove_rigid_body(top);
    assert_eq!(world.num_constraints(), 0);
}
