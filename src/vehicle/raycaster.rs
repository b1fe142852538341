use crate::dynamics::{RigidBodyHandle, RigidBodySet};
use crate::math::{Point, Real, Vector};
use crate::query::{cast_ray_against_shape, Ray};

/// The closest hit found by a [`VehicleRaycaster`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleRaycasterResult {
    /// The hit point, in world space.
    pub hit_point: Point<Real>,
    /// The normal of the hit surface, in world space.
    pub hit_normal: Vector<Real>,
    /// The fraction of the ray traveled before the hit.
    pub fraction: Real,
    /// The body that was hit, if the hit surface belongs to one.
    pub body: Option<RigidBodyHandle>,
}

/// Casts the suspension rays of a vehicle.
pub trait VehicleRaycaster {
    /// Casts the segment `from -> to` and returns the closest hit, ignoring the body `exclude`.
    fn cast_ray(
        &self,
        bodies: &RigidBodySet,
        from: &Point<Real>,
        to: &Point<Real>,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<VehicleRaycasterResult>;
}

/// A raycaster testing the ray against every body of the world responding to contacts.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultVehicleRaycaster;

impl VehicleRaycaster for DefaultVehicleRaycaster {
    fn cast_ray(
        &self,
        bodies: &RigidBodySet,
        from: &Point<Real>,
        to: &Point<Real>,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<VehicleRaycasterResult> {
        let ray = Ray::from_segment(*from, *to);
        let mut best: Option<VehicleRaycasterResult> = None;

        for (handle, body) in bodies.iter() {
            if Some(handle) == exclude || !body.has_contact_response() {
                continue;
            }

            let Some(hit) = cast_ray_against_shape(
                &ray,
                body.shape().as_support_map(),
                body.center_of_mass_transform(),
            ) else {
                continue;
            };

            if best.map(|b| hit.fraction < b.fraction).unwrap_or(true) {
                best = Some(VehicleRaycasterResult {
                    hit_point: hit.hit_point,
                    hit_normal: hit.normal,
                    fraction: hit.fraction,
                    body: Some(handle),
                });
            }
        }

        best
    }
}
