use crate::math::{Isometry, Real, Vector};
use crate::query::convex_cast::{CastResult, ConvexCast};
use crate::query::gjk::{CSOPoint, VoronoiSimplex};
use crate::shape::SupportMap;

/// The maximum number of iterations of the subsimplex cast.
pub const SUBSIMPLEX_MAX_ITERATIONS: usize = 32;

const EPSILON: Real = 1.0e-4;

/// Conservative-advancement convex cast, driven by the subsimplex closest point solver.
///
/// This is the ray-casting algorithm of Gino van den Bergen, applied to the Minkowski
/// difference of both shapes expressed in the local frame of the first shape. The ray
/// starts at the origin and follows the motion of the second shape relative to the first
/// one. At each iteration a support plane of the Minkowski difference separating it from the
/// current ray point is found, and the ray point is advanced onto that plane.
#[derive(Clone, Debug, Default)]
pub struct SubsimplexConvexCast {
    simplex: VoronoiSimplex,
    #[cfg(test)]
    lambda_trace: Vec<Real>,
}

impl SubsimplexConvexCast {
    /// Creates a new subsimplex convex cast.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConvexCast for SubsimplexConvexCast {
    fn time_of_impact(
        &mut self,
        shape_a: &dyn SupportMap,
        from_a: &Isometry<Real>,
        to_a: &Isometry<Real>,
        shape_b: &dyn SupportMap,
        from_b: &Isometry<Real>,
        to_b: &Isometry<Real>,
    ) -> Option<CastResult> {
        self.simplex.reset();
        #[cfg(test)]
        self.lambda_trace.clear();

        let lin_vel_a = to_a.translation.vector - from_a.translation.vector;
        let lin_vel_b = to_b.translation.vector - from_b.translation.vector;

        // Everything happens in the local frame of `shape_a`.
        let pos_ab = from_a.inv_mul(from_b);
        let r = from_a.inverse_transform_vector(&(lin_vel_b - lin_vel_a));

        let support = |dir: &Vector<Real>| {
            let sa = shape_a.local_support_point(dir);
            let sb = shape_b.support_point(&pos_ab, &-dir);
            CSOPoint::new(sa, sb)
        };

        let mut lambda: Real = 0.0;
        let mut x = Vector::zeros();
        let mut n = Vector::zeros();

        let mut v = x - support(&-r).point.coords;
        let mut dist2 = v.norm_squared();
        let mut max_iter = SUBSIMPLEX_MAX_ITERATIONS;

        while dist2 > EPSILON * EPSILON {
            if max_iter == 0 {
                log::debug!(
                    "Subsimplex convex cast did not converge after {} iterations.",
                    SUBSIMPLEX_MAX_ITERATIONS
                );
                return None;
            }
            max_iter -= 1;

            let p = support(&v);
            let w = x - p.point.coords;
            let v_dot_w = v.dot(&w);

            if v_dot_w > 0.0 {
                let v_dot_r = v.dot(&r);

                if v_dot_r >= -(Real::EPSILON * Real::EPSILON) {
                    // Moving away from the separating plane.
                    return None;
                }

                lambda -= v_dot_w / v_dot_r;
                #[cfg(test)]
                self.lambda_trace.push(lambda);
                if lambda > 1.0 {
                    return None;
                }

                x = r * lambda;
                n = v;
                self.simplex.reset();
            }

            let w = x - p.point.coords;
            let vertex = CSOPoint::new_with_point(w.into(), p.orig1, p.orig2);
            if !self.simplex.in_simplex(&vertex.point) {
                self.simplex.add_vertex(vertex);
            }

            match self.simplex.closest() {
                Some(closest) => {
                    v = closest;
                    dist2 = v.norm_squared();
                }
                None => dist2 = 0.0,
            }
        }

        if n.norm_squared() < Real::EPSILON * Real::EPSILON {
            // The shapes were already touching at the start of the motion.
            return None;
        }

        let (_, orig_b) = self.simplex.compute_points();
        let hit_local = orig_b + r * lambda;
        let hit_point = from_a.rotation * hit_local
            + from_a.translation.vector
            + lin_vel_a * lambda;

        Some(CastResult {
            fraction: lambda,
            normal: -(from_a.rotation * n.normalize()),
            hit_point,
        })
    }
}
