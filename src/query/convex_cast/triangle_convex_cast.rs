use crate::math::{Isometry, Real};
use crate::query::convex_cast::{CastResult, ConvexCast};
use crate::shape::{SupportMap, Triangle};

/// Casts a convex shape against a static set of triangles, and returns the earliest impact.
///
/// The shape moves from `from` to `to` while the triangles stay at `mesh_pos`. Each triangle
/// is tested with `cast`, so any [`ConvexCast`] algorithm can be used. Impacts with a
/// degenerate normal are skipped.
pub fn cast_convex_against_triangles<'a>(
    cast: &mut dyn ConvexCast,
    shape: &dyn SupportMap,
    from: &Isometry<Real>,
    to: &Isometry<Real>,
    mesh_pos: &Isometry<Real>,
    triangles: impl IntoIterator<Item = &'a Triangle>,
) -> Option<CastResult> {
    let mut best: Option<CastResult> = None;

    for triangle in triangles {
        let Some(hit) = cast.time_of_impact(shape, from, to, triangle, mesh_pos, mesh_pos) else {
            continue;
        };

        if hit.normal.norm_squared() <= 1.0e-4 {
            continue;
        }

        if best.map(|b| hit.fraction < b.fraction).unwrap_or(true) {
            best = Some(hit);
        }
    }

    best
}
