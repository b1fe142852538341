/*!
carom3d
=======

**carom3d** is a 3-dimensional discrete rigid-body dynamics library written with
the rust programming language.

It contains exact convex proximity queries (GJK closest points, sampling
penetration depth, conservative-advancement convex casts), a frame-persistent
contact cache, a fixed-step dynamics world with island-based sleeping, and a
raycast vehicle model built on top of these primitives.

Broad-phase pair generation, concrete shape geometry beyond a few reference
shapes, and rendering are left to the embedding application: they plug in
through the [`dynamics::CollisionDispatcher`], [`shape::SupportMap`],
[`vehicle::VehicleRaycaster`] and [`dynamics::DebugRenderBackend`] traits.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Maybe revisit this one later.
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.

extern crate alloc;

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;
pub extern crate simba;

pub mod dynamics;
pub mod query;
pub mod shape;
pub mod utils;
pub mod vehicle;

mod real {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Isometry3, Matrix3, Point3, Translation3, UnitVector3, Vector3};
    use na::{UnitQuaternion, U3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// A large value used as "infinity" for squared distances and fractions.
    pub const LARGE_FLOAT: Real = 1.0e18;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The dimension of the ambient space.
    pub type Dim = U3;

    /// The point type.
    pub use Point3 as Point;

    /// The angular vector type.
    pub type AngVector<N> = Vector3<N>;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The transformation matrix type.
    ///
    /// This is a rigid transform only: a rotation followed by a translation, no scale or shear.
    pub use Isometry3 as Isometry;

    /// The rotation matrix type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// The translation type.
    pub use Translation3 as Translation;

    /// The principal angular inertia of a rigid body.
    pub type PrincipalAngularInertia<N> = Vector3<N>;
}
