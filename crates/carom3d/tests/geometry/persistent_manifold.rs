use carom3d::dynamics::RigidBodyHandle;
use carom3d::math::{Isometry, Point, Vector};
use carom3d::query::{ManifoldPoint, PersistentManifold, MANIFOLD_CACHE_SIZE};

fn contact(local_a: Point<f32>, distance: f32) -> ManifoldPoint {
    let local_b = local_a - Vector::y() * distance;
    ManifoldPoint::new(local_a, local_b, Vector::y(), distance)
}

#[test]
fn deep_outlier_survives_eviction() {
    let mut manifold = PersistentManifold::new(
        RigidBodyHandle::from_raw_parts(0),
        RigidBodyHandle::from_raw_parts(1),
    );

    let _ = manifold.add_manifold_point(contact(Point::new(2.0, 0.0, 2.0), -0.5));
    for (dx, dz) in [(0.0, 0.0), (0.001, 0.0), (0.0, 0.001), (0.001, 0.001)] {
        let _ = manifold.add_manifold_point(contact(Point::new(dx, 0.0, dz), -0.01));
        assert!(manifold.num_contacts() <= MANIFOLD_CACHE_SIZE);
    }

    assert_eq!(manifold.num_contacts(), MANIFOLD_CACHE_SIZE);
    assert!(manifold
        .points()
        .iter()
        .any(|pt| pt.local_point_a == Point::new(2.0, 0.0, 2.0) && pt.distance == -0.5));
}

#[test]
fn refresh_removes_separated_points_only() {
    let mut manifold = PersistentManifold::default();
    let threshold = manifold.contact_breaking_threshold();

    let _ = manifold.add_manifold_point(contact(Point::new(1.0, 0.0, 0.0), 0.0));
    let _ = manifold.add_manifold_point(contact(Point::new(-1.0, 0.0, 0.0), 0.0));

    // Body A moves up by slightly less than the threshold: both points are kept.
    let pos_a = Isometry::translation(0.0, threshold * 0.9, 0.0);
    manifold.refresh_contact_points(&pos_a, &Isometry::identity());
    assert_eq!(manifold.num_contacts(), 2);
    for pt in manifold.points() {
        assert_relative_eq!(pt.distance, threshold * 0.9, epsilon = 1.0e-6);
    }

    // Then by more than the threshold: both points are removed.
    let pos_a = Isometry::translation(0.0, threshold * 1.1, 0.0);
    manifold.refresh_contact_points(&pos_a, &Isometry::identity());
    assert_eq!(manifold.num_contacts(), 0);
}
