use carom3d::math::{Isometry, Point, Real, Vector};
use carom3d::query::{cast_ray_against_shape, Ray};
use carom3d::shape::{Ball, Cuboid, SupportMap};

fn run_test(name: &str, shape: &dyn SupportMap, radius_bound: Real) {
    let mut rng = oorandom::Rand32::new(42);

    for _ in 0..100 {
        let dir = Vector::new(
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
            rng.rand_float() - 0.5,
        );
        let Some(dir) = dir.try_normalize(1.0e-3) else {
            continue;
        };
        let origin = Point::from(dir * 5.0);
        let ray = Ray::new(origin, -dir * 5.0);

        let hit = cast_ray_against_shape(&ray, shape, &Isometry::identity())
            .unwrap_or_else(|| panic!("Ray {ray:?} did not hit shape {name}"));

        assert!(hit.fraction >= 0.0 && hit.fraction <= 1.0);
        assert!(hit.hit_point.coords.norm() <= radius_bound + 5.0e-2);
        // The normal faces the ray.
        assert!(hit.normal.dot(&ray.dir) <= 0.0);
    }
}

#[test]
fn rays_toward_center_hit_ball() {
    run_test("ball", &Ball::new(1.0), 1.0);
}

#[test]
fn rays_toward_center_hit_cuboid() {
    let half_extents = Vector::new(1.0, 0.5, 0.8);
    run_test("cuboid", &Cuboid::new(half_extents), half_extents.norm());
}
