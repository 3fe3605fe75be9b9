//! Utility maths functions
//!
//! Angle wrapping and the small set of vector helpers used by the guidance
//! laws. All vectors are in the North-East-Down (NED) frame, so a positive
//! rotation about the z axis turns from North towards East (clockwise when
//! viewed from above).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation3, Unit, Vector3};
use num_traits::{Float, FloatConst};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Norm below which a vector is considered to have no direction.
pub const NORMALISE_EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// ANGLES
// ---------------------------------------------------------------------------

/// Get the signed angular distance between two angles in the range of [0, 2pi].
///
/// This function will return the shortest signed distance between a and b accounting for wrapping
/// between 0 and 2pi.
pub fn get_ang_dist_2pi<T>(a: T, b: T) -> T
where
    T: Float + FloatConst
{
    let tau_t: T = T::PI() + T::PI();

    let c = rem_euclid(a - b, tau_t);
    let d = rem_euclid(b - a, tau_t);

    if c < d {
        -c
    }
    else {
        d
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Reduce an angle into the range [0, 2pi).
pub fn mod_2pi(angle_rad: f64) -> f64 {
    let r = rem_euclid(angle_rad, std::f64::consts::TAU);

    // Catch the round-off case noted on `rem_euclid`
    if r >= std::f64::consts::TAU { 0.0 } else { r }
}

/// Shift `angle_rad` by a single turn so that it lies within pi of
/// `centre_rad`.
///
/// Only one correction is applied, matching the guidance laws which expect
/// both inputs to already be within a turn of each other.
pub fn wrap_to_band(angle_rad: f64, centre_rad: f64) -> f64 {
    let pi = std::f64::consts::PI;

    if angle_rad - centre_rad < -pi {
        angle_rad + std::f64::consts::TAU
    }
    else if angle_rad - centre_rad > pi {
        angle_rad - std::f64::consts::TAU
    }
    else {
        angle_rad
    }
}

// ---------------------------------------------------------------------------
// VECTORS
// ---------------------------------------------------------------------------

/// Angle of the horizontal component of `v` measured from North (x) towards
/// East (y).
pub fn angle_2d(v: &Vector3<f64>) -> f64 {
    v[1].atan2(v[0])
}

/// Rotation of `theta_rad` about the NED z (down) axis.
pub fn rot_z(theta_rad: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), theta_rad)
}

/// Unit vector pointing along the horizontal direction `theta_rad`.
pub fn heading_vec(theta_rad: f64) -> Vector3<f64> {
    rot_z(theta_rad) * Vector3::x()
}

/// Normalise a vector, returning `None` if it is too short to have a
/// meaningful direction.
pub fn normalise(v: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    Unit::try_new(*v, NORMALISE_EPSILON)
}

/// Horizontal (North-East) distance between two points.
pub fn horizontal_dist(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Returns true if `p` lies in the closed half space defined by `point` and
/// `normal`, i.e. `(p - point) . normal >= 0`.
pub fn in_half_plane(
    p: &Vector3<f64>,
    point: &Vector3<f64>,
    normal: &Vector3<f64>
) -> bool {
    (p - point).dot(normal) >= 0.0
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_get_ang_dist_2pi() {
        assert_eq!(get_ang_dist_2pi(1f64, 2f64), 1f64);
        assert_eq!(get_ang_dist_2pi(2f64, 1f64), -1f64);
        assert_eq!(get_ang_dist_2pi(0f64, TAU), 0f64);
        assert_eq!(get_ang_dist_2pi(TAU, 0f64), 0f64);
        assert!((get_ang_dist_2pi(1f64, TAU) + 1f64).abs() < 1e-12);
        assert!((get_ang_dist_2pi(0f64, TAU - 1f64) + 1f64).abs() < 1e-12);
    }

    #[test]
    fn test_mod_2pi() {
        assert!((mod_2pi(-FRAC_PI_2) - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((mod_2pi(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(mod_2pi(0.0), 0.0);
        assert!(mod_2pi(-1e-20) < TAU);
    }

    #[test]
    fn test_wrap_to_band() {
        assert!((wrap_to_band(3.0 * FRAC_PI_2, 0.0) + FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_to_band(-3.0 * FRAC_PI_2, 0.0) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(wrap_to_band(1.0, 0.5), 1.0);
        assert!((wrap_to_band(0.1, 2.0 * PI) - (0.1 + TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_rot_z_turns_north_to_east() {
        let east = rot_z(FRAC_PI_2) * Vector3::x();
        assert!((east - Vector3::y()).norm() < 1e-12);

        let h = heading_vec(PI);
        assert!((h + Vector3::x()).norm() < 1e-12);
        assert!((angle_2d(&Vector3::new(0.0, -2.0, 5.0)) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_normalise() {
        assert!(normalise(&Vector3::zeros()).is_none());

        let n = normalise(&Vector3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((n.into_inner() - Vector3::new(0.6, 0.0, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn test_half_plane_antisymmetric() {
        let point = Vector3::new(10.0, -5.0, -100.0);
        let normal = Vector3::new(0.6, 0.8, 0.0);

        let ahead = Vector3::new(20.0, 3.0, -100.0);
        let behind = Vector3::new(0.0, -10.0, -100.0);

        assert!(in_half_plane(&ahead, &point, &normal));
        assert!(!in_half_plane(&ahead, &point, &-normal));
        assert!(in_half_plane(&behind, &point, &-normal));
        assert!(!in_half_plane(&behind, &point, &normal));

        // Points on the boundary are inside both
        let on = point + Vector3::new(-0.8, 0.6, 0.0) * 7.0;
        assert!(in_half_plane(&on, &point, &normal));
        assert!(in_half_plane(&on, &point, &-normal));
    }
}
