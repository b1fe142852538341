use crate::dynamics::{IntegrationParameters, ManifoldSet, RigidBody, RigidBodySet};
use crate::math::{Point, Real, Vector};
use crate::query::gjk::GjkPairDetector;
use crate::query::{update_contact_manifold_convex_convex, ManifoldResult};

/// Generates and updates the persistent manifolds of the overlapping body pairs.
///
/// The dispatcher owns the creation and destruction of manifolds: the dynamics world only
/// consumes the manifolds it leaves in the [`ManifoldSet`].
pub trait CollisionDispatcher {
    /// Updates the manifolds of all the pairs of `bodies` that may be in contact.
    fn dispatch_all_collision_pairs(
        &mut self,
        bodies: &RigidBodySet,
        manifolds: &mut ManifoldSet,
        params: &IntegrationParameters,
    );
}

/// Can contacts between these bodies be generated at all?
pub fn needs_collision(body0: &RigidBody, body1: &RigidBody) -> bool {
    (body0.is_active() || body1.is_active())
        && (!body0.is_static_or_kinematic() || !body1.is_static_or_kinematic())
}

/// Are the contacts between these bodies solved?
pub fn needs_response(body0: &RigidBody, body1: &RigidBody) -> bool {
    body0.has_contact_response()
        && body1.has_contact_response()
        && (!body0.is_static_or_kinematic() || !body1.is_static_or_kinematic())
}

fn aabbs_intersect(a: &(Point<Real>, Point<Real>), b: &(Point<Real>, Point<Real>)) -> bool {
    a.0.x <= b.1.x
        && a.1.x >= b.0.x
        && a.0.y <= b.1.y
        && a.1.y >= b.0.y
        && a.0.z <= b.1.z
        && a.1.z >= b.0.z
}

/// A dispatcher testing every pair of bodies with the convex/convex narrow phase.
///
/// This has a quadratic cost and is only meant for small scenes and tests. Bounding boxes,
/// enlarged by the contact breaking threshold, are compared before running GJK.
#[derive(Clone, Debug, Default)]
pub struct BruteForceDispatcher {
    gjk: GjkPairDetector,
}

impl BruteForceDispatcher {
    /// Creates a new brute-force dispatcher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollisionDispatcher for BruteForceDispatcher {
    fn dispatch_all_collision_pairs(
        &mut self,
        bodies: &RigidBodySet,
        manifolds: &mut ManifoldSet,
        params: &IntegrationParameters,
    ) {
        let margin = Vector::repeat(params.contact_breaking_threshold);
        let all: alloc::vec::Vec<_> = bodies
            .iter()
            .map(|(handle, body)| {
                let (mins, maxs) = body.aabb();
                (handle, body, (mins - margin, maxs + margin))
            })
            .collect();

        for (i, (handle0, body0, aabb0)) in all.iter().enumerate() {
            for (handle1, body1, aabb1) in &all[i + 1..] {
                let existing = manifolds.find(*handle0, *handle1);

                if body0.is_static_or_kinematic() && body1.is_static_or_kinematic() {
                    if let Some(existing) = existing {
                        manifolds.release_manifold(existing);
                    }
                    continue;
                }

                // Keep the contacts of sleeping pairs untouched.
                if !needs_collision(body0, body1) {
                    continue;
                }

                if !aabbs_intersect(aabb0, aabb1) {
                    if let Some(existing) = existing {
                        manifolds.release_manifold(existing);
                    }
                    continue;
                }

                let handle = existing.unwrap_or_else(|| manifolds.get_new_manifold(*handle0, *handle1));
                let Some(manifold) = manifolds.get_mut(handle) else {
                    continue;
                };

                // The manifold stores its bodies in the order it was created with.
                let (body_a, body_b) = if manifold.body0 == *handle0 {
                    (body0, body1)
                } else {
                    (body1, body0)
                };

                self.gjk.set_cached_separating_axis(Vector::y());
                let mut result = ManifoldResult::new(
                    manifold,
                    *body_a.center_of_mass_transform(),
                    body_a.material(),
                    *body_b.center_of_mass_transform(),
                    body_b.material(),
                );
                let _ = update_contact_manifold_convex_convex(
                    &mut self.gjk,
                    body_a.shape().as_support_map(),
                    body_b.shape().as_support_map(),
                    &mut result,
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::RigidBodyConstructionInfo;
    use crate::math::Isometry;
    use crate::shape::SharedShape;

    fn body(mass: Real, shape: SharedShape, pos: Isometry<Real>) -> RigidBody {
        RigidBody::new(RigidBodyConstructionInfo::from_shape(mass, shape).with_transform(pos))
    }

    #[test]
    fn manifolds_follow_overlaps() {
        let mut bodies = RigidBodySet::new();
        let mut manifolds = ManifoldSet::new();
        let mut dispatcher = BruteForceDispatcher::new();
        let params = IntegrationParameters::default();

        let ground = bodies.insert(body(
            0.0,
            SharedShape::cuboid(10.0, 0.5, 10.0),
            Isometry::identity(),
        ));
        let ball = bodies.insert(body(
            1.0,
            SharedShape::ball(0.5),
            Isometry::translation(0.0, 0.99, 0.0),
        ));
        let far = bodies.insert(body(
            1.0,
            SharedShape::ball(0.5),
            Isometry::translation(0.0, 10.0, 0.0),
        ));

        dispatcher.dispatch_all_collision_pairs(&bodies, &mut manifolds, &params);
        assert_eq!(manifolds.len(), 1);
        let handle = manifolds.find(ball, ground).unwrap();
        let manifold = manifolds.get(handle).unwrap();
        assert_eq!(manifold.num_contacts(), 1);
        assert_relative_eq!(manifold.points()[0].distance, -0.01, epsilon = 1.0e-4);
        assert!(manifolds.find(far, ground).is_none());

        bodies[ball].translate(&Vector::new(0.0, 5.0, 0.0));
        dispatcher.dispatch_all_collision_pairs(&bodies, &mut manifolds, &params);
        assert!(manifolds.is_empty());
    }

    #[test]
    fn static_pairs_are_ignored() {
        let mut bodies = RigidBodySet::new();
        let mut manifolds = ManifoldSet::new();
        let mut dispatcher = BruteForceDispatcher::new();

        let _ = bodies.insert(body(0.0, SharedShape::ball(1.0), Isometry::identity()));
        let _ = bodies.insert(body(0.0, SharedShape::ball(1.0), Isometry::identity()));

        dispatcher.dispatch_all_collision_pairs(
            &bodies,
            &mut manifolds,
            &IntegrationParameters::default(),
        );
        assert!(manifolds.is_empty());
    }
}
