use carom3d::math::{Isometry, Vector};
use carom3d::query::gjk::GjkPairDetector;
use carom3d::shape::Ball;

#[test]
fn overlapping_balls_penetration_depth() {
    let ball = Ball::new(1.0);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(1.5, 0.0, 0.0);

    let mut gjk = GjkPairDetector::new();
    let res = gjk.closest_points(&pos1, &ball, &pos2, &ball, 1.0e10).unwrap();

    assert_relative_eq!(res.distance, -0.5, epsilon = 1.0e-4);
    assert_relative_eq!(res.normal_on_b.x.abs(), 1.0, epsilon = 1.0e-4);
    assert_relative_eq!(res.normal_on_b.y, 0.0, epsilon = 1.0e-4);
    assert_relative_eq!(res.normal_on_b.z, 0.0, epsilon = 1.0e-4);
}

#[test]
fn separated_balls_distance() {
    let ball = Ball::new(1.0);
    let pos1 = Isometry::identity();
    let pos2 = Isometry::translation(0.0, 0.0, 5.0);

    let mut gjk = GjkPairDetector::new();
    let res = gjk.closest_points(&pos1, &ball, &pos2, &ball, 1.0e10).unwrap();

    assert_relative_eq!(res.distance, 3.0, epsilon = 1.0e-4);
    assert_relative_eq!(res.normal_on_b, -Vector::z(), epsilon = 1.0e-4);
    assert!(gjk
        .closest_points(&pos1, &ball, &pos2, &ball, 2.0 * 2.0)
        .is_none());
}
