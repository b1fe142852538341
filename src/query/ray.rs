//! Ray casting against support-mapped shapes.

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::convex_cast::{CastResult, ConvexCast, SubsimplexConvexCast};
use crate::query::gjk::ConstantOrigin;
use crate::shape::SupportMap;

/// A ray for ray-casting queries.
///
/// Points along the ray are computed as `origin + dir * t`. Casts performed with
/// [`cast_ray_against_shape`] only consider `t` in `[0, 1]`, so `dir` is the full segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Creates the ray going from `from` to `to`.
    pub fn from_segment(from: Point<Real>, to: Point<Real>) -> Ray {
        Ray::new(from, to - from)
    }

    /// Computes the point at the given parameter on this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Casts the segment `ray.origin -> ray.point_at(1.0)` against `shape` at `shape_pos`.
///
/// The returned fraction is relative to the full segment, and the normal is the outward
/// surface normal of `shape` at the hit. Hits with a degenerate normal are discarded, and
/// rays starting inside of the shape do not hit it.
pub fn cast_ray_against_shape(
    ray: &Ray,
    shape: &dyn SupportMap,
    shape_pos: &Isometry<Real>,
) -> Option<CastResult> {
    let from = Isometry::translation(ray.origin.x, ray.origin.y, ray.origin.z);
    let to_point = ray.point_at(1.0);
    let to = Isometry::translation(to_point.x, to_point.y, to_point.z);

    let mut cast = SubsimplexConvexCast::new();
    let hit = cast.time_of_impact(&ConstantOrigin, &from, &to, shape, shape_pos, shape_pos)?;

    if hit.normal.norm_squared() > 1.0e-4 {
        Some(CastResult {
            hit_point: ray.point_at(hit.fraction),
            ..hit
        })
    } else {
        None
    }
}
