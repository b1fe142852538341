use carom3d::math::{Point, Vector};
use carom3d::query::gjk::{CSOPoint, VoronoiSimplex};

#[test]
fn single_point_is_its_own_closest_point() {
    let mut simplex = VoronoiSimplex::new();
    let p = CSOPoint::new_with_point(
        Point::new(1.0, 2.0, 3.0),
        Point::new(1.0, 2.0, 3.0),
        Point::origin(),
    );
    simplex.add_vertex(p);

    let v = simplex.closest().unwrap();
    assert_relative_eq!(v, Vector::new(1.0, 2.0, 3.0));
    assert_eq!(simplex.closest_result().barycentric, [1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn simplex_never_exceeds_four_vertices() {
    let mut rng = oorandom::Rand32::new(0);
    let mut simplex = VoronoiSimplex::new();

    for _ in 0..100 {
        let pt = Point::new(
            rng.rand_float() * 2.0 - 1.0,
            rng.rand_float() * 2.0 - 1.0,
            rng.rand_float() * 2.0 - 1.0,
        );
        // The origin is enclosed by a full simplex.
        if simplex.is_full() {
            simplex.reset();
        }

        if !simplex.in_simplex(&pt) {
            simplex.add_vertex(CSOPoint::new_with_point(pt, pt, Point::origin()));
            let _ = simplex.closest();
        }
        assert!(simplex.num_vertices() <= 4);
    }
}
