use crate::math::{Isometry, Point, Real, UnitVector, Vector, LARGE_FLOAT};
use crate::query::gjk::GjkPairDetector;
use crate::shape::SupportMap;
use alloc::vec::Vec;
use na::Unit;

/// The number of fixed sampling directions of the penetration solver.
pub const NUM_UNIT_SPHERE_POINTS: usize = 42;

/// The penetration of two shapes, as found by [`MinkowskiPenetrationDepth`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PenetrationResult {
    /// The direction the first shape has to move along to stop penetrating the second one.
    pub separating_axis: Vector<Real>,
    /// The deepest point of the first shape inside of the second one.
    pub point_on_a: Point<Real>,
    /// The point of the second shape closest to `point_on_a` along `separating_axis`.
    pub point_on_b: Point<Real>,
}

/// A penetration depth solver sampling the Minkowski difference along a fixed set of
/// directions.
///
/// The directions are the 42 vertices of a once-subdivided icosahedron, completed by the
/// principal axes of both shapes. The direction with the smallest overlap is refined by
/// pushing the first shape out of the second along it and running GJK on the separated pair.
#[derive(Clone, Debug)]
pub struct MinkowskiPenetrationDepth {
    directions: Vec<UnitVector<Real>>,
}

impl Default for MinkowskiPenetrationDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl MinkowskiPenetrationDepth {
    /// Creates a new penetration solver.
    pub fn new() -> Self {
        Self {
            directions: unit_sphere_directions(),
        }
    }

    /// The fixed sampling directions of this solver.
    pub fn directions(&self) -> &[UnitVector<Real>] {
        &self.directions
    }

    /// Computes the penetration of `g1` at `pos1` into `g2` at `pos2`.
    ///
    /// Returns `None` if no sampled direction shows an overlap, or if the refinement step
    /// failed.
    pub fn calc_pen_depth<G1, G2>(
        &self,
        g1: &G1,
        g2: &G2,
        pos1: &Isometry<Real>,
        pos2: &Isometry<Real>,
    ) -> Option<PenetrationResult>
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let mut min_proj = LARGE_FLOAT;
        let mut min_norm = Vector::zeros();

        let frame_axes = [pos1.rotation, pos2.rotation]
            .into_iter()
            .flat_map(|rot| {
                [Vector::x(), Vector::y(), Vector::z()]
                    .into_iter()
                    .flat_map(move |axis| [rot * axis, -(rot * axis)])
            });
        let samples = self
            .directions
            .iter()
            .map(|dir| dir.into_inner())
            .chain(frame_axes);

        for norm in samples {
            let p_world = g1.support_point_without_margin(pos1, &-norm);
            let q_world = g2.support_point_without_margin(pos2, &norm);
            let delta = norm.dot(&(q_world - p_world));

            if delta < min_proj {
                min_proj = delta;
                min_norm = norm;
            }
        }

        // No penetration.
        if min_proj < 0.0 {
            return None;
        }

        let extra_separation = 0.5;
        min_proj += extra_separation + g1.margin() + g2.margin();

        let mut displaced_pos1 = *pos1;
        displaced_pos1.translation.vector += min_norm * min_proj;

        let mut gjk = GjkPairDetector::with_penetration_solver(None);
        gjk.set_cached_separating_axis(-min_norm);
        let res = gjk.closest_points(&displaced_pos1, g1, pos2, g2, LARGE_FLOAT)?;

        let corrected_min_proj = min_proj - res.distance;

        Some(PenetrationResult {
            separating_axis: min_norm,
            point_on_a: res.point_on_b - min_norm * corrected_min_proj,
            point_on_b: res.point_on_b,
        })
    }
}

/// The 12 vertices and 30 edge midpoints of an icosahedron, projected on the unit sphere.
fn unit_sphere_directions() -> Vec<UnitVector<Real>> {
    let phi = (1.0 + (5.0 as Real).sqrt()) * 0.5;
    let mut vertices = Vec::with_capacity(12);

    for s1 in [-1.0, 1.0] {
        for s2 in [-1.0, 1.0] {
            vertices.push(Vector::new(0.0, s1, s2 * phi));
            vertices.push(Vector::new(s1, s2 * phi, 0.0));
            vertices.push(Vector::new(s2 * phi, 0.0, s1));
        }
    }

    let mut directions: Vec<_> = vertices.iter().map(|v| Unit::new_normalize(*v)).collect();

    // Neighbor vertices of an icosahedron with unit coordinates are 2 units apart.
    for i in 0..vertices.len() {
        for j in i + 1..vertices.len() {
            if ((vertices[i] - vertices[j]).norm_squared() - 4.0).abs() < 1.0e-3 {
                directions.push(Unit::new_normalize(vertices[i] + vertices[j]));
            }
        }
    }

    debug_assert_eq!(directions.len(), NUM_UNIT_SPHERE_POINTS);
    directions
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::{Ball, Cuboid};

    #[test]
    fn sampling_directions() {
        let dirs = unit_sphere_directions();
        assert_eq!(dirs.len(), NUM_UNIT_SPHERE_POINTS);
        for (i, a) in dirs.iter().enumerate() {
            for b in &dirs[i + 1..] {
                assert!(a.dot(b) < 0.99);
            }
        }
    }

    #[test]
    fn deep_box_penetration() {
        let solver = MinkowskiPenetrationDepth::new();
        let cuboid = Cuboid::new(Vector::repeat(1.0));
        let pos1 = Isometry::translation(0.0, 1.5, 0.0);
        let pos2 = Isometry::identity();
        let res = solver.calc_pen_depth(&cuboid, &cuboid, &pos1, &pos2).unwrap();

        assert_relative_eq!(res.separating_axis, Vector::y(), epsilon = 1.0e-5);
        assert_relative_eq!(
            (res.point_on_a - res.point_on_b).norm(),
            0.5,
            epsilon = 1.0e-3
        );
    }

    #[test]
    fn separated_shapes_have_no_penetration() {
        let solver = MinkowskiPenetrationDepth::new();
        let ball = Ball::new(1.0);
        let pos2 = Isometry::translation(5.0, 0.0, 0.0);
        assert!(solver
            .calc_pen_depth(&ball, &ball, &Isometry::identity(), &pos2)
            .is_none());
    }
}
