//! Frame-persistent contact caches and the narrow phase feeding them.

pub use self::convex_convex::update_contact_manifold_convex_convex;
pub use self::manifold_point::{ContactUserHandle, ManifoldPoint};
pub use self::manifold_result::{ContactMaterial, ManifoldResult};
pub use self::persistent_manifold::{
    ContactDestroyedCallback, PersistentManifold, DEFAULT_CONTACT_BREAKING_THRESHOLD,
    MANIFOLD_CACHE_SIZE,
};

mod convex_convex;
mod manifold_point;
mod manifold_result;
mod persistent_manifold;
