//! The Gilbert-Johnson-Keerthi distance algorithm, with margins.
//!
//! # How it works here
//!
//! Every [`SupportMap`] is a *core* convex set dilated by a sphere of radius
//! [`SupportMap::margin`]. The GJK iterations run on the Minkowski difference of the two
//! cores only, and the margins are subtracted from the core distance at the end. Shallow
//! penetrations (which only overlap the margins) are therefore resolved by plain GJK,
//! which is both fast and robust.
//!
//! When the cores themselves overlap, GJK alone cannot measure the penetration depth: the
//! detector then falls back to a [`MinkowskiPenetrationDepth`] solver.
//!
//! # Conventions
//!
//! The [`ClosestPoints::normal_on_b`] points from the second shape toward the first one, and
//! [`ClosestPoints::distance`] is negative when the shapes penetrate. The witness point on
//! the first shape is `point_on_b + normal_on_b * distance`.

use crate::math::{Isometry, Point, Real, Vector, LARGE_FLOAT};
use crate::query::gjk::{CSOPoint, MinkowskiPenetrationDepth, VoronoiSimplex};
use crate::shape::SupportMap;

/// The maximum number of iterations of the GJK loop.
pub const GJK_MAX_ITERATIONS: usize = 1000;

/// The relative squared distance improvement under which GJK stops.
pub const REL_ERROR2: Real = 1.0e-6;

/// The result of a closest-points query between two convex shapes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ClosestPoints {
    /// The unit contact normal, in world-space, pointing from the second shape toward the first.
    pub normal_on_b: Vector<Real>,
    /// The witness point on the second shape, in world-space.
    pub point_on_b: Point<Real>,
    /// The signed distance between the shapes. Negative if they penetrate.
    pub distance: Real,
}

impl ClosestPoints {
    /// The witness point on the first shape, in world-space.
    #[inline]
    pub fn point_on_a(&self) -> Point<Real> {
        self.point_on_b + self.normal_on_b * self.distance
    }
}

/// How the last GJK loop ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GjkExit {
    /// No query has been run yet.
    NotRun,
    /// The shapes are further apart than the requested maximum distance.
    Separated,
    /// The new support point was already part of the simplex.
    DuplicateSupportPoint,
    /// The support point did not bring the simplex closer to the origin.
    NoProgress,
    /// The simplex solver could not compute a closest point.
    DegenerateSimplex,
    /// The closest point is (almost) the origin: the cores touch or overlap.
    OriginReached,
    /// The simplex is a tetrahedron enclosing the origin.
    FullSimplex,
    /// The iteration budget was exhausted.
    MaxIterations,
}

impl GjkExit {
    /// Did the loop stop on a degenerate configuration?
    pub fn is_degenerate(self) -> bool {
        !matches!(
            self,
            GjkExit::NotRun | GjkExit::Separated | GjkExit::MaxIterations
        )
    }
}

/// Computes closest points between two support-mapped shapes with GJK.
///
/// The detector owns its simplex and its last separating axis, so it can be reused across
/// queries without allocation.
#[derive(Clone, Debug)]
pub struct GjkPairDetector {
    simplex: VoronoiSimplex,
    cached_separating_axis: Vector<Real>,
    penetration_solver: Option<MinkowskiPenetrationDepth>,
    ignore_margin: bool,
    last_exit: GjkExit,
    iterations: usize,
}

impl Default for GjkPairDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GjkPairDetector {
    /// A detector falling back to the sampling penetration solver for deep penetrations.
    pub fn new() -> Self {
        Self::with_penetration_solver(Some(MinkowskiPenetrationDepth::new()))
    }

    /// A detector with an optional penetration solver.
    ///
    /// Without penetration solver, a query between shapes whose cores overlap returns `None`.
    pub fn with_penetration_solver(penetration_solver: Option<MinkowskiPenetrationDepth>) -> Self {
        Self {
            simplex: VoronoiSimplex::new(),
            cached_separating_axis: Vector::y(),
            penetration_solver,
            ignore_margin: false,
            last_exit: GjkExit::NotRun,
            iterations: 0,
        }
    }

    /// Sets the initial search direction of the next query.
    pub fn set_cached_separating_axis(&mut self, axis: Vector<Real>) {
        self.cached_separating_axis = axis;
    }

    /// The last separating axis found (not normalized).
    pub fn cached_separating_axis(&self) -> Vector<Real> {
        self.cached_separating_axis
    }

    /// If set, the margins of both shapes are ignored.
    pub fn set_ignore_margin(&mut self, ignore_margin: bool) {
        self.ignore_margin = ignore_margin;
    }

    /// How the last GJK loop ended.
    pub fn last_exit(&self) -> GjkExit {
        self.last_exit
    }

    /// The number of iterations performed by the last GJK loop.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Computes the closest points between `g1` at `pos1` and `g2` at `pos2`.
    ///
    /// Returns `None` if the shapes are further apart than `max_dist_squared.sqrt()`, or if
    /// no reliable result could be computed.
    pub fn closest_points<G1, G2>(
        &mut self,
        pos1: &Isometry<Real>,
        g1: &G1,
        pos2: &Isometry<Real>,
        g2: &G2,
        max_dist_squared: Real,
    ) -> Option<ClosestPoints>
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        // Work close to the origin for better floating point accuracy.
        let position_offset = (pos1.translation.vector + pos2.translation.vector) * 0.5;
        let mut local_pos1 = *pos1;
        let mut local_pos2 = *pos2;
        local_pos1.translation.vector -= position_offset;
        local_pos2.translation.vector -= position_offset;

        let (margin1, margin2) = if self.ignore_margin {
            (0.0, 0.0)
        } else {
            (g1.margin(), g2.margin())
        };
        let margin = margin1 + margin2;

        let mut distance = 0.0;
        let mut normal_on_b = Vector::zeros();
        let mut point_on_b = Point::origin();
        let mut is_valid = false;
        let mut check_simplex = false;
        let mut squared_distance = LARGE_FLOAT;

        self.last_exit = GjkExit::MaxIterations;
        self.iterations = 0;
        self.simplex.reset();

        loop {
            let p_world = g1.support_point_without_margin(&local_pos1, &-self.cached_separating_axis);
            let q_world = g2.support_point_without_margin(&local_pos2, &self.cached_separating_axis);
            let w = Point::from(p_world - q_world);

            let delta = self.cached_separating_axis.dot(&w.coords);

            // Potential exit: the shapes don't overlap.
            if delta > 0.0 && delta * delta > squared_distance * max_dist_squared {
                self.last_exit = GjkExit::Separated;
                check_simplex = true;
                break;
            }

            if self.simplex.in_simplex(&w) {
                self.last_exit = GjkExit::DuplicateSupportPoint;
                check_simplex = true;
                break;
            }

            // Are we getting any closer?
            let f0 = squared_distance - delta;
            let f1 = squared_distance * REL_ERROR2;
            if f0 <= f1 {
                self.last_exit = GjkExit::NoProgress;
                check_simplex = true;
                break;
            }

            self.simplex
                .add_vertex(CSOPoint::new_with_point(w, p_world, q_world));

            let Some(new_axis) = self.simplex.closest() else {
                self.last_exit = GjkExit::DegenerateSimplex;
                check_simplex = true;
                break;
            };

            if new_axis.norm_squared() < REL_ERROR2 {
                self.cached_separating_axis = new_axis;
                self.last_exit = GjkExit::OriginReached;
                check_simplex = true;
                break;
            }

            let previous_squared_distance = squared_distance;
            squared_distance = new_axis.norm_squared();

            if previous_squared_distance - squared_distance
                <= Real::EPSILON * previous_squared_distance
            {
                self.cached_separating_axis = self.simplex.backup_closest();
                self.last_exit = GjkExit::NoProgress;
                check_simplex = true;
                break;
            }

            self.cached_separating_axis = new_axis;

            self.iterations += 1;
            if self.iterations > GJK_MAX_ITERATIONS {
                log::debug!(
                    "GJK exhausted its {} iterations. Separating axis: {:?}",
                    GJK_MAX_ITERATIONS,
                    self.cached_separating_axis
                );
                break;
            }

            if self.simplex.is_full() {
                self.cached_separating_axis = self.simplex.backup_closest();
                self.last_exit = GjkExit::FullSimplex;
                break;
            }
        }

        if check_simplex {
            let (_, pb) = self.simplex.compute_points();
            point_on_b = pb;
            normal_on_b = self.cached_separating_axis;

            let len_sqr = self.cached_separating_axis.norm_squared();

            if len_sqr > Real::EPSILON * Real::EPSILON {
                let rlen = 1.0 / len_sqr.sqrt();
                normal_on_b *= rlen;
                let s = squared_distance.sqrt();
                point_on_b += self.cached_separating_axis * (margin2 / s);
                distance = (1.0 / rlen) - margin;
                is_valid = true;
            }
        }

        let catch_degenerate_penetration = self.penetration_solver.is_some()
            && self.last_exit.is_degenerate()
            && (distance + margin) < 0.01;

        if !is_valid || catch_degenerate_penetration {
            if let Some(solver) = &self.penetration_solver {
                log::debug!(
                    "GJK fallback to the penetration solver (exit: {:?}).",
                    self.last_exit
                );

                if let Some(pen) =
                    solver.calc_pen_depth(g1, g2, &local_pos1, &local_pos2)
                {
                    self.cached_separating_axis = pen.separating_axis;
                    let diff = pen.point_on_b - pen.point_on_a;
                    let len_sqr = diff.norm_squared();

                    if len_sqr > Real::EPSILON * Real::EPSILON {
                        let pen_distance = -len_sqr.sqrt();

                        // Only replace valid results if the penetration is deeper.
                        if !is_valid || pen_distance < distance {
                            distance = pen_distance;
                            point_on_b = pen.point_on_b;
                            normal_on_b = diff / len_sqr.sqrt();
                            is_valid = true;
                        }
                    }
                }
            }
        }

        if is_valid && (distance < 0.0 || distance * distance < max_dist_squared) {
            Some(ClosestPoints {
                normal_on_b,
                point_on_b: point_on_b + position_offset,
                distance,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::{Ball, Cuboid};

    #[test]
    fn separated_balls() {
        let mut gjk = GjkPairDetector::new();
        let ball = Ball::new(1.0);
        let pos1 = Isometry::translation(0.0, 0.0, 0.0);
        let pos2 = Isometry::translation(3.0, 0.0, 0.0);
        let res = gjk
            .closest_points(&pos1, &ball, &pos2, &ball, LARGE_FLOAT)
            .unwrap();

        assert_relative_eq!(res.distance, 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(res.normal_on_b, -Vector::x(), epsilon = 1.0e-5);
        assert_relative_eq!(res.point_on_b, Point::new(2.0, 0.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(res.point_on_a(), Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn far_shapes_are_culled_by_max_distance() {
        let mut gjk = GjkPairDetector::new();
        let ball = Ball::new(0.5);
        let pos1 = Isometry::identity();
        let pos2 = Isometry::translation(0.0, 10.0, 0.0);
        assert!(gjk
            .closest_points(&pos1, &ball, &pos2, &ball, 0.1 * 0.1)
            .is_none());
    }

    #[test]
    fn shallow_box_penetration() {
        let mut gjk = GjkPairDetector::new();
        let cuboid = Cuboid::new(Vector::repeat(1.0));
        let pos1 = Isometry::translation(0.0, 1.98, 0.0);
        let pos2 = Isometry::identity();
        let res = gjk
            .closest_points(&pos1, &cuboid, &pos2, &cuboid, LARGE_FLOAT)
            .unwrap();

        assert_relative_eq!(res.distance, -0.02, epsilon = 1.0e-3);
        assert_relative_eq!(res.normal_on_b, Vector::y(), epsilon = 1.0e-3);
    }
}
