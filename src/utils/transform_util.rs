//! Rigid transform integration and small vector helpers.

use crate::math::{Isometry, Matrix, Point, Real, Rotation, Translation, UnitVector, Vector};
use crate::shape::SupportMap;
use na::{Quaternion, Rotation3, Unit};

/// The maximum rotation angle, in radians, an integration step is allowed to perform.
pub const ANGULAR_MOTION_THRESHOLD: Real = core::f32::consts::FRAC_PI_4;

/// Integrates `cur` by the given velocities during `dt` using the exponential map.
///
/// The angular displacement of a single step is clamped to [`ANGULAR_MOTION_THRESHOLD`]. For
/// small angles a Taylor expansion of `sin(x) / x` is used so the axis computation stays
/// finite for vanishing angular velocities.
pub fn integrate_transform(
    cur: &Isometry<Real>,
    linvel: &Vector<Real>,
    angvel: &Vector<Real>,
    dt: Real,
) -> Isometry<Real> {
    let translation = cur.translation.vector + linvel * dt;

    let mut angvel = *angvel;
    let mut angle = angvel.norm();
    if angle * dt > ANGULAR_MOTION_THRESHOLD {
        angvel *= ANGULAR_MOTION_THRESHOLD / (angle * dt);
        angle = ANGULAR_MOTION_THRESHOLD / dt;
    }

    let axis = if angle < 0.001 {
        // Taylor expansion of sin(x/2)/x.
        angvel * (0.5 * dt - (dt * dt * dt) * 0.020_833_334 * angle * angle)
    } else {
        angvel * ((0.5 * angle * dt).sin() / angle)
    };

    let dorn = Quaternion::new((angle * dt * 0.5).cos(), axis.x, axis.y, axis.z);
    let orn = Rotation::new_normalize(dorn * cur.rotation.quaternion());

    Isometry::from_parts(Translation::from(translation), orn)
}

/// The rotation axis and angle transforming the orientation of `t0` into the orientation of `t1`.
///
/// An identity rotation yields the `x` axis with a zero angle.
pub fn calculate_diff_axis_angle(
    t0: &Isometry<Real>,
    t1: &Isometry<Real>,
) -> (UnitVector<Real>, Real) {
    let dorn = t1.rotation * t0.rotation.inverse();
    dorn.axis_angle().unwrap_or((Vector::x_axis(), 0.0))
}

/// Computes the linear and angular velocities that move `t0` to `t1` in `dt`.
pub fn calculate_velocity(
    t0: &Isometry<Real>,
    t1: &Isometry<Real>,
    dt: Real,
) -> (Vector<Real>, Vector<Real>) {
    let linvel = (t1.translation.vector - t0.translation.vector) / dt;
    let (axis, angle) = calculate_diff_axis_angle(t0, t1);
    (linvel, axis.into_inner() * (angle / dt))
}

/// Computes two unit vectors `p` and `q` such that `(n, p, q)` is an orthonormal basis.
///
/// The vector `n` must be normalized.
pub fn plane_space(n: &Vector<Real>) -> (Vector<Real>, Vector<Real>) {
    if n.z.abs() > core::f32::consts::FRAC_1_SQRT_2 {
        // Choose p in the y-z plane.
        let a = n.y * n.y + n.z * n.z;
        let k = 1.0 / a.sqrt();
        let p = Vector::new(0.0, -n.z * k, n.y * k);
        let q = Vector::new(a * k, -n.x * p.z, n.x * p.y);
        (p, q)
    } else {
        // Choose p in the x-y plane.
        let a = n.x * n.x + n.y * n.y;
        let k = 1.0 / a.sqrt();
        let p = Vector::new(-n.y * k, n.x * k, 0.0);
        let q = Vector::new(-n.z * p.y, n.z * p.x, a * k);
        (p, q)
    }
}

/// The rotation part of `pos` as a 3x3 matrix (its columns are the rotated frame axes).
#[inline]
pub fn rotation_basis(pos: &Isometry<Real>) -> Matrix<Real> {
    pos.rotation.to_rotation_matrix().into_inner()
}

/// Converts an orthonormal basis into a unit quaternion.
///
/// The matrix is not re-orthonormalized: it is the caller's responsibility to provide a
/// proper rotation matrix.
#[inline]
pub fn basis_to_rotation(basis: &Matrix<Real>) -> Rotation<Real> {
    Rotation::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*basis))
}

/// The world-space axis-aligned bounding box of a support-mapped shape at `pos`.
pub fn aabb_from_support_map<G: ?Sized + SupportMap>(
    shape: &G,
    pos: &Isometry<Real>,
) -> (Point<Real>, Point<Real>) {
    let mut mins = Point::origin();
    let mut maxs = Point::origin();

    for i in 0..3 {
        let mut axis = Vector::zeros();
        axis[i] = 1.0;
        let dir = Unit::new_unchecked(axis);
        maxs[i] = shape.support_point_toward(pos, &dir)[i];
        mins[i] = shape.support_point_toward(pos, &-dir)[i];
    }

    (mins, maxs)
}
