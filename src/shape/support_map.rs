//! Traits for support mapping based shapes.

use crate::math::{Isometry, Point, Real, Vector};
use na::Unit;

/// Traits of convex shapes representable by a support mapping function.
///
/// A shape is described by a *core* convex set dilated by a sphere of radius
/// [`SupportMap::margin`]. The GJK-based queries operate on the core and add the margins back,
/// which keeps them robust for shallow penetrations.
pub trait SupportMap {
    /// Evaluates the support function of the core of this shape, ignoring its margin.
    ///
    /// `dir` does not have to be normalized and may be zero.
    fn local_support_point_without_margin(&self, dir: &Vector<Real>) -> Point<Real>;

    /// The radius of the sphere this shape's core is dilated by.
    fn margin(&self) -> Real {
        0.0
    }

    /// Evaluates the support function of this shape, margin included.
    ///
    /// A support function is a function associating a vector to the shape point which maximizes
    /// their dot product.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let core = self.local_support_point_without_margin(dir);
        let margin = self.margin();

        if margin != 0.0 {
            let dir = if dir.norm_squared() < Real::EPSILON * Real::EPSILON {
                Vector::repeat(-1.0)
            } else {
                *dir
            };
            core + dir.normalize() * margin
        } else {
            core
        }
    }

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point_without_margin(dir.as_ref()) + dir.into_inner() * self.margin()
    }

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }

    /// Same as `self.support_point` except that `dir` is normalized.
    fn support_point_toward(
        &self,
        transform: &Isometry<Real>,
        dir: &Unit<Vector<Real>>,
    ) -> Point<Real> {
        let local_dir = Unit::new_unchecked(transform.inverse_transform_vector(dir));
        transform * self.local_support_point_toward(&local_dir)
    }

    /// Evaluates the core support function of this shape transformed by `transform`.
    fn support_point_without_margin(
        &self,
        transform: &Isometry<Real>,
        dir: &Vector<Real>,
    ) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point_without_margin(&local_dir)
    }
}
