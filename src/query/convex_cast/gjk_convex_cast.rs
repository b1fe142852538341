use crate::math::{Isometry, Point, Real, Vector, LARGE_FLOAT};
use crate::query::convex_cast::{CastResult, ConvexCast};
use crate::query::gjk::GjkPairDetector;
use crate::shape::SupportMap;

/// The maximum number of iterations of the GJK convex cast.
pub const GJK_CAST_MAX_ITERATIONS: usize = 32;

/// The distance under which the GJK convex cast considers the shapes to be touching.
pub const GJK_CAST_RADIUS: Real = 1.0e-2;

/// Conservative-advancement convex cast, using full GJK distance queries.
///
/// At each step, the closest points of the shapes at the current fraction are computed and
/// the fraction is advanced by the distance divided by the approach velocity along the
/// contact normal. The advancement is monotonic, and any backtracking is treated as a miss.
#[derive(Clone, Debug)]
pub struct GjkConvexCast {
    gjk: GjkPairDetector,
    /// The penetration tolerated before an impact with the shapes moving apart is rejected.
    pub allowed_penetration: Real,
    #[cfg(test)]
    lambda_trace: Vec<Real>,
}

impl Default for GjkConvexCast {
    fn default() -> Self {
        Self::new()
    }
}

impl GjkConvexCast {
    /// Creates a new GJK convex cast with no allowed penetration.
    pub fn new() -> Self {
        Self {
            gjk: GjkPairDetector::with_penetration_solver(None),
            allowed_penetration: 0.0,
            #[cfg(test)]
            lambda_trace: Vec::new(),
        }
    }

    fn closest_points_at(
        &mut self,
        shape_a: &dyn SupportMap,
        pos_a: &Isometry<Real>,
        shape_b: &dyn SupportMap,
        pos_b: &Isometry<Real>,
    ) -> Option<(Real, Vector<Real>, Point<Real>)> {
        self.gjk
            .closest_points(pos_a, shape_a, pos_b, shape_b, LARGE_FLOAT)
            .map(|res| (res.distance, res.normal_on_b, res.point_on_b))
    }
}

fn interpolate(from: &Isometry<Real>, to: &Isometry<Real>, t: Real) -> Isometry<Real> {
    let mut result = *from;
    result.translation.vector = from.translation.vector.lerp(&to.translation.vector, t);
    result
}

impl ConvexCast for GjkConvexCast {
    fn time_of_impact(
        &mut self,
        shape_a: &dyn SupportMap,
        from_a: &Isometry<Real>,
        to_a: &Isometry<Real>,
        shape_b: &dyn SupportMap,
        from_b: &Isometry<Real>,
        to_b: &Isometry<Real>,
    ) -> Option<CastResult> {
        #[cfg(test)]
        self.lambda_trace.clear();

        let lin_vel_a = to_a.translation.vector - from_a.translation.vector;
        let lin_vel_b = to_b.translation.vector - from_b.translation.vector;
        let r = lin_vel_a - lin_vel_b;

        let mut lambda: Real = 0.0;
        let mut last_lambda: Real = 0.0;

        let (mut dist, mut n, mut c) =
            self.closest_points_at(shape_a, from_a, shape_b, from_b)?;
        dist += self.allowed_penetration;

        let mut num_iter = 0;

        while dist > GJK_CAST_RADIUS {
            num_iter += 1;
            if num_iter > GJK_CAST_MAX_ITERATIONS {
                log::debug!(
                    "GJK convex cast did not converge after {} iterations.",
                    GJK_CAST_MAX_ITERATIONS
                );
                return None;
            }

            let projected_lin_vel = r.dot(&n);
            if projected_lin_vel >= -Real::EPSILON {
                return None;
            }
            lambda -= dist / projected_lin_vel;
            #[cfg(test)]
            self.lambda_trace.push(lambda);

            if lambda > 1.0 || lambda < 0.0 || lambda <= last_lambda {
                return None;
            }
            last_lambda = lambda;

            let pos_a = interpolate(from_a, to_a, lambda);
            let pos_b = interpolate(from_b, to_b, lambda);
            let (new_dist, new_n, new_c) =
                self.closest_points_at(shape_a, &pos_a, shape_b, &pos_b)?;

            if new_dist < 0.0 {
                return Some(CastResult {
                    fraction: last_lambda,
                    normal: new_n,
                    hit_point: new_c,
                });
            }

            dist = new_dist;
            n = new_n;
            c = new_c;
        }

        // Don't report an impact for a motion away from the contact normal.
        if n.dot(&r) >= -self.allowed_penetration {
            return None;
        }

        Some(CastResult {
            fraction: lambda,
            normal: n,
            hit_point: c,
        })
    }
}
