use carom3d::dynamics::{
    DiscreteDynamicsWorld, RigidBody, RigidBodyConstructionInfo, RigidBodyHandle, WorldError,
};
use carom3d::math::{Isometry, Point, Vector};
use carom3d::shape::SharedShape;
use carom3d::vehicle::{DefaultVehicleRaycaster, RaycastVehicle, VehicleTuning};

const DT: f32 = 1.0 / 60.0;

fn add_ground(world: &mut DiscreteDynamicsWorld) -> RigidBodyHandle {
    world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(0.0, SharedShape::cuboid(50.0, 0.5, 50.0))
            .with_transform(Isometry::translation(0.0, -0.5, 0.0)),
    ))
}

fn add_chassis(world: &mut DiscreteDynamicsWorld, height: f32) -> RigidBodyHandle {
    world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(800.0, SharedShape::cuboid(1.0, 0.5, 2.0))
            .with_transform(Isometry::translation(0.0, height, 0.0)),
    ))
}

/// A car with its right, up and forward axes along `x`, `y` and `z`.
fn build_car(world: &DiscreteDynamicsWorld, chassis: RigidBodyHandle) -> RaycastVehicle {
    let tuning = VehicleTuning {
        suspension_stiffness: 20.0,
        suspension_compression: 4.4,
        suspension_damping: 2.3,
        ..VehicleTuning::default()
    };

    let mut vehicle = RaycastVehicle::new(tuning, chassis, Box::new(DefaultVehicleRaycaster));
    vehicle.set_coordinate_system(0, 1, 2);

    for (x, z) in [(1.0, 1.5), (-1.0, 1.5), (1.0, -1.5), (-1.0, -1.5)] {
        let _ = vehicle.add_wheel(
            world.bodies(),
            Point::new(x, 0.0, z),
            -Vector::y(),
            -Vector::x(),
            0.6,
            0.5,
            &tuning,
            z > 0.0,
        );
    }

    vehicle
}

#[test]
fn airborne_wheels_stay_at_rest_length() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let chassis = add_chassis(&mut world, 10.0);
    let car = build_car(&world, chassis);
    let handle = world.add_vehicle(car).unwrap();

    let _ = world.step_simulation(DT, 1, DT);

    let vehicle = world.vehicle(handle).unwrap();
    assert_eq!(vehicle.num_wheels(), 4);
    for wheel in vehicle.wheels() {
        assert!(!wheel.raycast_info.is_in_contact);
        assert_eq!(wheel.raycast_info.ground_object, None);
        assert_eq!(wheel.raycast_info.suspension_length, wheel.suspension_rest_length());
        assert_eq!(wheel.wheels_suspension_force, 0.0);
    }
}

#[test]
fn suspension_pushes_the_chassis_up() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let ground = add_ground(&mut world);
    let chassis = add_chassis(&mut world, 1.0);
    let car = build_car(&world, chassis);
    let handle = world.add_vehicle(car).unwrap();

    let _ = world.step_simulation(DT, 1, DT);

    let vehicle = world.vehicle(handle).unwrap();
    for wheel in vehicle.wheels() {
        assert!(wheel.raycast_info.is_in_contact);
        assert_eq!(wheel.raycast_info.ground_object, Some(ground));
        assert!(wheel.raycast_info.suspension_length < wheel.suspension_rest_length());
        assert!(wheel.wheels_suspension_force > 0.0);
        assert_relative_eq!(wheel.raycast_info.contact_normal_ws, Vector::y(), epsilon = 1.0e-3);
    }

    // The suspension slows down the fall of the chassis.
    assert!(world.bodies()[chassis].linvel().y > -10.0 * DT + 0.05);
}

#[test]
fn engine_drives_the_car_forward() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let _ = add_ground(&mut world);
    let chassis = add_chassis(&mut world, 1.0);
    let car = build_car(&world, chassis);
    let handle = world.add_vehicle(car).unwrap();

    {
        let vehicle = world.vehicle_mut(handle).unwrap();
        vehicle.apply_engine_force(800.0, 2);
        vehicle.apply_engine_force(800.0, 3);
    }

    for _ in 0..120 {
        let _ = world.step_simulation(DT, 1, DT);
    }

    let vehicle = world.vehicle(handle).unwrap();
    let body = &world.bodies()[chassis];
    assert!(body.center_of_mass_position().z > 1.0);
    assert!(body.center_of_mass_position().y > 0.5);
    assert!(body.center_of_mass_position().y < 1.5);
    assert!(vehicle.current_speed_km_hour() > 0.0);
    assert!(vehicle.wheels().iter().all(|w| w.raycast_info.is_in_contact));
    assert_relative_eq!(vehicle.forward_vector(world.bodies()), Vector::z(), epsilon = 0.1);
}

#[test]
fn vehicles_need_a_dynamic_chassis() {
    let mut world = DiscreteDynamicsWorld::default();
    let ground = add_ground(&mut world);
    let car = RaycastVehicle::new(
        VehicleTuning::default(),
        ground,
        Box::new(DefaultVehicleRaycaster),
    );
    assert_eq!(
        world.add_vehicle(car).err(),
        Some(WorldError::StaticChassis(ground))
    );

    let unknown = RigidBodyHandle::from_raw_parts(7);
    let car = RaycastVehicle::new(
        VehicleTuning::default(),
        unknown,
        Box::new(DefaultVehicleRaycaster),
    );
    assert_eq!(
        world.add_vehicle(car).err(),
        Some(WorldError::UnknownBody(unknown))
    );

    // Removing the chassis removes its vehicle.
    let chassis = add_chassis(&mut world, 5.0);
    let handle = world
        .add_vehicle(RaycastVehicle::new(
            VehicleTuning::default(),
            chassis,
            Box::new(DefaultVehicleRaycaster),
        ))
        .unwrap();
    assert!(world.vehicle(handle).is_some());
    let _ = world.remove_rigid_body(chassis);
    assert!(world.vehicle(handle).is_none());
}

#[test]
fn axle_parallel_to_suspension_stays_finite() {
    let mut world = DiscreteDynamicsWorld::default();
    world.set_gravity(Vector::new(0.0, -10.0, 0.0));

    let _ = add_ground(&mut world);
    let chassis = add_chassis(&mut world, 1.0);
    let tuning = VehicleTuning::default();
    let mut car = RaycastVehicle::new(tuning, chassis, Box::new(DefaultVehicleRaycaster));
    car.set_coordinate_system(0, 1, 2);

    for (x, z) in [(1.0, 1.5), (-1.0, 1.5), (1.0, -1.5), (-1.0, -1.5)] {
        let wheel = car.add_wheel(
            world.bodies(),
            Point::new(x, 0.0, z),
            -Vector::y(),
            -Vector::y(),
            0.6,
            0.5,
            &tuning,
            z > 0.0,
        );
        wheel.engine_force = 500.0;
    }
    let handle = world.add_vehicle(car).unwrap();

    for _ in 0..60 {
        let _ = world.step_simulation(DT, 1, DT);
    }

    let body = &world.bodies()[chassis];
    assert!(body.center_of_mass_position().coords.iter().all(|x| x.is_finite()));
    assert!(body.linvel().iter().all(|x| x.is_finite()));
    assert!(body.angvel().iter().all(|x| x.is_finite()));

    let vehicle = world.vehicle(handle).unwrap();
    for i in 0..vehicle.num_wheels() {
        let pos = vehicle.wheel_transform_ws(i);
        assert!(pos.translation.vector.iter().all(|x| x.is_finite()));
        assert!(pos.rotation.coords.iter().all(|x| x.is_finite()));
    }
}
