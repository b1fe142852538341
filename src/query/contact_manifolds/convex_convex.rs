use crate::math::Real;
use crate::query::contact_manifolds::ManifoldResult;
use crate::query::gjk::GjkPairDetector;
use crate::shape::SupportMap;

/// Updates the manifold of `result` with the closest points between two convex shapes.
///
/// Shapes further apart than their margins plus the contact breaking threshold don't generate
/// contacts. The manifold is refreshed afterward so stale points are removed.
///
/// Returns `true` if a contact was generated.
pub fn update_contact_manifold_convex_convex(
    gjk: &mut GjkPairDetector,
    shape_a: &dyn SupportMap,
    shape_b: &dyn SupportMap,
    result: &mut ManifoldResult,
) -> bool {
    let max_dist: Real =
        shape_a.margin() + shape_b.margin() + result.manifold().contact_breaking_threshold();
    let pos_a = *result.pos_a();
    let pos_b = *result.pos_b();

    let contact = gjk.closest_points(&pos_a, shape_a, &pos_b, shape_b, max_dist * max_dist);

    if let Some(contact) = &contact {
        result.add_contact_point(&contact.normal_on_b, &contact.point_on_b, contact.distance);
    }

    result.refresh_contact_points();
    contact.is_some()
}
