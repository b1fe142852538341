use crate::math::{Isometry, Point, Real, Vector};
use crate::query::contact_manifolds::{ManifoldPoint, PersistentManifold};

/// The surface properties of a body involved in a contact.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ContactMaterial {
    /// The friction coefficient.
    pub friction: Real,
    /// The restitution coefficient.
    pub restitution: Real,
}

impl ContactMaterial {
    /// Combines the friction coefficients of two materials.
    pub fn combine_friction(&self, other: &Self) -> Real {
        const MAX_FRICTION: Real = 10.0;
        (self.friction * other.friction).clamp(-MAX_FRICTION, MAX_FRICTION)
    }

    /// Combines the restitution coefficients of two materials.
    pub fn combine_restitution(&self, other: &Self) -> Real {
        self.restitution * other.restitution
    }
}

/// Feeds contacts found by a narrow-phase algorithm into a persistent manifold.
pub struct ManifoldResult<'a> {
    manifold: &'a mut PersistentManifold,
    pos_a: Isometry<Real>,
    pos_b: Isometry<Real>,
    combined_friction: Real,
    combined_restitution: Real,
}

impl<'a> ManifoldResult<'a> {
    /// Creates a result writing into `manifold` for bodies at `pos_a` and `pos_b`.
    pub fn new(
        manifold: &'a mut PersistentManifold,
        pos_a: Isometry<Real>,
        material_a: ContactMaterial,
        pos_b: Isometry<Real>,
        material_b: ContactMaterial,
    ) -> Self {
        Self {
            manifold,
            pos_a,
            pos_b,
            combined_friction: material_a.combine_friction(&material_b),
            combined_restitution: material_a.combine_restitution(&material_b),
        }
    }

    /// The manifold this result writes into.
    pub fn manifold(&self) -> &PersistentManifold {
        self.manifold
    }

    /// The world-space position of the first body.
    pub fn pos_a(&self) -> &Isometry<Real> {
        &self.pos_a
    }

    /// The world-space position of the second body.
    pub fn pos_b(&self) -> &Isometry<Real> {
        &self.pos_b
    }

    /// Adds a contact with the world-space normal `normal_on_b` and point `point_on_b`.
    ///
    /// Contacts further than the breaking threshold of the manifold are ignored. A contact
    /// close to a cached one replaces it instead of being added.
    pub fn add_contact_point(
        &mut self,
        normal_on_b: &Vector<Real>,
        point_on_b: &Point<Real>,
        depth: Real,
    ) {
        if depth > self.manifold.contact_breaking_threshold() {
            return;
        }

        let point_a = point_on_b + normal_on_b * depth;
        let local_a = self.pos_a.inverse_transform_point(&point_a);
        let local_b = self.pos_b.inverse_transform_point(point_on_b);

        let mut new_pt = ManifoldPoint::new(local_a, local_b, *normal_on_b, depth);
        new_pt.position_world_on_a = point_a;
        new_pt.position_world_on_b = *point_on_b;
        new_pt.combined_friction = self.combined_friction;
        new_pt.combined_restitution = self.combined_restitution;

        match self.manifold.cache_entry(&new_pt) {
            Some(index) => self.manifold.replace_contact_point(new_pt, index),
            None => {
                let _ = self.manifold.add_manifold_point(new_pt);
            }
        }
    }

    /// Refreshes the manifold with the positions of this result.
    pub fn refresh_contact_points(&mut self) {
        self.manifold
            .refresh_contact_points(&self.pos_a, &self.pos_b);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combined_material() {
        let a = ContactMaterial {
            friction: 5.0,
            restitution: 0.5,
        };
        let b = ContactMaterial {
            friction: 4.0,
            restitution: 0.2,
        };
        assert_eq!(a.combine_friction(&b), 10.0);
        assert_relative_eq!(a.combine_restitution(&b), 0.1);
    }

    #[test]
    fn far_contacts_are_ignored() {
        let mut manifold = PersistentManifold::default();
        let material = ContactMaterial {
            friction: 0.5,
            restitution: 0.0,
        };
        let mut result = ManifoldResult::new(
            &mut manifold,
            Isometry::identity(),
            material,
            Isometry::identity(),
            material,
        );
        result.add_contact_point(&Vector::y(), &Point::origin(), 0.5);
        result.add_contact_point(&Vector::y(), &Point::new(1.0, 0.0, 0.0), -0.1);
        assert_eq!(result.manifold().num_contacts(), 1);

        let pt = result.manifold().contact_point(0);
        assert_relative_eq!(pt.local_point_a, Point::new(1.0, -0.1, 0.0));
        assert_relative_eq!(pt.combined_friction, 0.25);
    }
}
