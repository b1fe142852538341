//! Non-persistent geometric queries, and the persistent contact manifold.
//!
//! * [`gjk`] computes closest points between support-mapped shapes, with a sampling
//!   penetration depth fallback.
//! * [`convex_cast`] computes the time of impact of shapes undergoing translational motions.
//! * [`cast_ray_against_shape`] casts segments against support-mapped shapes.
//! * [`PersistentManifold`] caches contact points between two bodies across frames.

pub use self::contact_manifolds::{
    update_contact_manifold_convex_convex, ContactDestroyedCallback, ContactMaterial,
    ContactUserHandle, ManifoldPoint, ManifoldResult, PersistentManifold,
    DEFAULT_CONTACT_BREAKING_THRESHOLD, MANIFOLD_CACHE_SIZE,
};
pub use self::convex_cast::{
    cast_convex_against_triangles, CastResult, ConvexCast, GjkConvexCast, SubsimplexConvexCast,
};
pub use self::ray::{cast_ray_against_shape, Ray};

mod contact_manifolds;
pub mod convex_cast;
pub mod gjk;
mod ray;
