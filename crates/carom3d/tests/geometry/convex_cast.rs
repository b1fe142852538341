use carom3d::math::{Isometry, Vector};
use carom3d::query::{ConvexCast, GjkConvexCast, SubsimplexConvexCast};
use carom3d::shape::{Ball, Cuboid};

#[test]
fn cast_fractions_stay_in_unit_interval() {
    let mut rng = oorandom::Rand32::new(7);
    let ball = Ball::new(0.5);
    let cuboid = Cuboid::new(Vector::new(1.0, 0.5, 2.0));
    let mut subsimplex = SubsimplexConvexCast::new();
    let mut gjk = GjkConvexCast::new();

    for _ in 0..200 {
        let start = Vector::new(
            rng.rand_float() * 20.0 - 10.0,
            rng.rand_float() * 20.0 - 10.0,
            rng.rand_float() * 20.0 - 10.0,
        );
        let from_a = Isometry::new(start, na::zero());
        let to_a = Isometry::new(-start, na::zero());
        let at_rest = Isometry::identity();

        for caster in [&mut subsimplex as &mut dyn ConvexCast, &mut gjk] {
            if let Some(hit) = caster.time_of_impact(&ball, &from_a, &to_a, &cuboid, &at_rest, &at_rest) {
                assert!(hit.fraction >= 0.0 && hit.fraction <= 1.0);
            }
        }
    }
}

#[test]
fn both_casts_agree_on_head_on_impact() {
    let ball = Ball::new(1.0);
    let from_a = Isometry::translation(-5.0, 0.0, 0.0);
    let to_a = Isometry::translation(5.0, 0.0, 0.0);
    let pos_b = Isometry::identity();

    let hit1 = SubsimplexConvexCast::new()
        .time_of_impact(&ball, &from_a, &to_a, &ball, &pos_b, &pos_b)
        .unwrap();
    let hit2 = GjkConvexCast::new()
        .time_of_impact(&ball, &from_a, &to_a, &ball, &pos_b, &pos_b)
        .unwrap();

    // The balls touch once the first one moved by 3 out of 10.
    assert_relative_eq!(hit1.fraction, 0.3, epsilon = 1.0e-3);
    assert_relative_eq!(hit2.fraction, 0.3, epsilon = 2.0e-3);
}
