//! Support mapping based Cuboid shape.

use crate::math::{Point, Real, Vector};
use crate::shape::{Shape, ShapeType, SupportMap};
use crate::utils::WSign;

/// The default margin of cuboids.
pub const DEFAULT_CUBOID_MARGIN: Real = 0.04;

/// Shape of a box.
///
/// The box is stored as a core box shrunk by `margin` on every side, so its support function
/// (margin included) reaches `half_extents` along the principal axes with slightly rounded
/// edges.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
    margin: Real,
}

impl Cuboid {
    /// Creates a new box from its half-extents. Half-extents are the box half-width along each
    /// axis. Each half-extent must be positive.
    ///
    /// The margin is [`DEFAULT_CUBOID_MARGIN`], reduced if the box is thinner than that.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        let margin = DEFAULT_CUBOID_MARGIN.min(half_extents.min());
        Cuboid {
            half_extents,
            margin,
        }
    }

    /// Creates a new box with an explicit margin, clamped to its smallest half-extent.
    #[inline]
    pub fn with_margin(half_extents: Vector<Real>, margin: Real) -> Cuboid {
        Cuboid {
            half_extents,
            margin: margin.max(0.0).min(half_extents.min()),
        }
    }

    /// The half-extents of this box without its margin.
    #[inline]
    pub fn core_half_extents(&self) -> Vector<Real> {
        self.half_extents - Vector::repeat(self.margin)
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point_without_margin(&self, dir: &Vector<Real>) -> Point<Real> {
        dir.copy_sign_to(self.core_half_extents()).into()
    }

    #[inline]
    fn margin(&self) -> Real {
        self.margin
    }
}

impl Shape for Cuboid {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Cuboid
    }

    fn as_support_map(&self) -> &dyn SupportMap {
        self
    }

    fn compute_local_inertia(&self, mass: Real) -> Vector<Real> {
        let lx = 2.0 * self.half_extents.x;
        let ly = 2.0 * self.half_extents.y;
        let lz = 2.0 * self.half_extents.z;
        Vector::new(
            mass / 12.0 * (ly * ly + lz * lz),
            mass / 12.0 * (lx * lx + lz * lz),
            mass / 12.0 * (lx * lx + ly * ly),
        )
    }
}
