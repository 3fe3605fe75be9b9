//! Dubins path planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::{FRAC_PI_2, PI, TAU};

// External
use log::trace;
use nalgebra::Vector3;

// Internal
use super::{DubinsCase, DubinsPath, HalfPlane, TurnCircles};
use crate::path::Configuration;
use util::maths::{angle_2d, heading_vec, horizontal_dist, mod_2pi, normalise, rot_z};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Minimum horizontal separation between the start and end configurations,
/// in turn radii.
pub const MIN_SEPARATION_RADII: f64 = 3.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The geometry of one candidate case.
struct CaseGeometry {
    case: DubinsCase,
    length_m: f64,
    centre_s: Vector3<f64>,
    centre_e: Vector3<f64>,
    arc_s_rad: f64,
    arc_e_rad: f64,
    q1: Vector3<f64>,
    z1: Vector3<f64>,
    z2: Vector3<f64>,
    theta_rad: f64,
    ell_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DubinsError {
    #[error(
        "Start and end configurations are {separation_m:.3} m apart, at least \
         {min_separation_m:.3} m is required"
    )]
    InfeasibleGeometry {
        separation_m: f64,
        min_separation_m: f64,
    },

    #[error("None of the four Dubins cases have a valid tangent")]
    NoFeasibleCase,

    #[error("Turn radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Plan the shortest Dubins path from `start` to `end` with the given turn
/// radius.
///
/// The configurations must be at least [`MIN_SEPARATION_RADII`] turn radii
/// apart horizontally. Ties between cases go to the lowest
/// [`DubinsCase::index`].
pub fn plan(
    start: &Configuration,
    end: &Configuration,
    radius_m: f64,
) -> Result<DubinsPath, DubinsError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(DubinsError::InvalidRadius(radius_m));
    }

    let separation_m = horizontal_dist(&start.position_m_ned, &end.position_m_ned);
    let min_separation_m = MIN_SEPARATION_RADII * radius_m;
    if separation_m < min_separation_m {
        return Err(DubinsError::InfeasibleGeometry {
            separation_m,
            min_separation_m,
        });
    }

    let circles = TurnCircles::new(start, end, radius_m);

    let candidates: Vec<Option<CaseGeometry>> = DubinsCase::ALL
        .iter()
        .map(|case| {
            let geom = case_geometry(*case, &circles, start, end, radius_m);
            if geom.is_none() {
                trace!("Dubins case {:?} has no tangent, excluded", case);
            }
            geom
        })
        .collect();

    let mut lengths_m = [None; 4];
    for (i, c) in candidates.iter().enumerate() {
        lengths_m[i] = c.as_ref().map(|g| g.length_m);
    }

    // Strictly shorter to replace, so the first of equal lengths is kept
    let best = candidates
        .into_iter()
        .flatten()
        .fold(None, |best: Option<CaseGeometry>, g| match best {
            Some(b) if b.length_m <= g.length_m => Some(b),
            _ => Some(g),
        })
        .ok_or(DubinsError::NoFeasibleCase)?;

    trace!(
        "Dubins lengths {:?}, selected {:?} ({:.3} m)",
        lengths_m,
        best.case,
        best.length_m
    );

    let (dir_s, dir_e) = best.case.dirs();

    Ok(DubinsPath {
        start: *start,
        end: *end,
        radius_m,
        length_m: best.length_m,
        case: best.case,
        lengths_m,
        centre_s_m_ned: best.centre_s,
        dir_s,
        centre_e_m_ned: best.centre_e,
        dir_e,
        arc_s_rad: best.arc_s_rad,
        arc_e_rad: best.arc_e_rad,
        h1: HalfPlane::new(best.z1, best.q1),
        h2: HalfPlane::new(best.z2, best.q1),
        h3: HalfPlane::new(end.position_m_ned, end.course_vec()),
        theta_rad: best.theta_rad,
        ell_m: best.ell_m,
        circles,
    })
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TurnCircles {
    /// Find the turn circles of both configurations, offset a radius to the
    /// right and left of each course.
    pub fn new(start: &Configuration, end: &Configuration, radius_m: f64) -> Self {
        let offset = |config: &Configuration, angle_rad: f64| {
            config.position_m_ned + rot_z(angle_rad) * config.course_vec() * radius_m
        };

        Self {
            right_s_m_ned: offset(start, FRAC_PI_2),
            left_s_m_ned: offset(start, -FRAC_PI_2),
            right_e_m_ned: offset(end, FRAC_PI_2),
            left_e_m_ned: offset(end, -FRAC_PI_2),
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Positive angle swept turning from `from_rad` to `to_rad` in the direction
/// of increasing angle.
fn sweep(from_rad: f64, to_rad: f64) -> f64 {
    mod_2pi(TAU + mod_2pi(to_rad) - mod_2pi(from_rad))
}

/// Compute the geometry of one case, or `None` if the case has no tangent
/// line.
fn case_geometry(
    case: DubinsCase,
    circles: &TurnCircles,
    start: &Configuration,
    end: &Configuration,
    r: f64,
) -> Option<CaseGeometry> {
    let chi_s = start.course_rad;
    let chi_e = end.course_rad;

    match case {
        // Outer tangent between two clockwise circles, the tangent points are
        // to the left of the line between the centres
        DubinsCase::Rsr => {
            let (c_s, c_e) = (circles.right_s_m_ned, circles.right_e_m_ned);
            let diff = c_e - c_s;
            let ell_m = diff.norm();
            let theta_rad = angle_2d(&diff);
            let q1 = normalise(&diff)?.into_inner();
            let to_tangent = rot_z(-FRAC_PI_2) * q1 * r;

            let arc_s_rad = sweep(chi_s - FRAC_PI_2, theta_rad - FRAC_PI_2);
            let arc_e_rad = sweep(theta_rad - FRAC_PI_2, chi_e - FRAC_PI_2);

            Some(CaseGeometry {
                case,
                length_m: ell_m + r * (arc_s_rad + arc_e_rad),
                centre_s: c_s,
                centre_e: c_e,
                arc_s_rad,
                arc_e_rad,
                q1,
                z1: c_s + to_tangent,
                z2: c_e + to_tangent,
                theta_rad,
                ell_m,
            })
        }

        // Inner tangent from a clockwise to a counter-clockwise circle
        DubinsCase::Rsl => {
            let (c_s, c_e) = (circles.right_s_m_ned, circles.left_e_m_ned);
            let diff = c_e - c_s;
            let ell_m = diff.norm();
            let theta_rad = angle_2d(&diff);
            let tangent_m = inner_tangent_length(ell_m, r)?;

            let theta_2 = theta_rad - FRAC_PI_2 + (2.0 * r / ell_m).asin();

            let arc_s_rad = sweep(chi_s - FRAC_PI_2, theta_2);
            let arc_e_rad = sweep(chi_e + FRAC_PI_2, theta_2 + PI);

            Some(CaseGeometry {
                case,
                length_m: tangent_m + r * (arc_s_rad + arc_e_rad),
                centre_s: c_s,
                centre_e: c_e,
                arc_s_rad,
                arc_e_rad,
                q1: heading_vec(theta_2 + FRAC_PI_2),
                z1: c_s + heading_vec(theta_2) * r,
                z2: c_e + heading_vec(theta_2 + PI) * r,
                theta_rad,
                ell_m,
            })
        }

        // Inner tangent from a counter-clockwise to a clockwise circle
        DubinsCase::Lsr => {
            let (c_s, c_e) = (circles.left_s_m_ned, circles.right_e_m_ned);
            let diff = c_e - c_s;
            let ell_m = diff.norm();
            let theta_rad = angle_2d(&diff);
            let tangent_m = inner_tangent_length(ell_m, r)?;

            let theta_2 = (2.0 * r / ell_m).acos();

            let arc_s_rad = sweep(theta_rad + theta_2, chi_s + FRAC_PI_2);
            let arc_e_rad = sweep(theta_rad + theta_2 - PI, chi_e - FRAC_PI_2);

            Some(CaseGeometry {
                case,
                length_m: tangent_m + r * (arc_s_rad + arc_e_rad),
                centre_s: c_s,
                centre_e: c_e,
                arc_s_rad,
                arc_e_rad,
                q1: heading_vec(theta_rad + theta_2 - FRAC_PI_2),
                z1: c_s + heading_vec(theta_rad + theta_2) * r,
                z2: c_e + heading_vec(theta_rad + theta_2 - PI) * r,
                theta_rad,
                ell_m,
            })
        }

        // Outer tangent between two counter-clockwise circles
        DubinsCase::Lsl => {
            let (c_s, c_e) = (circles.left_s_m_ned, circles.left_e_m_ned);
            let diff = c_e - c_s;
            let ell_m = diff.norm();
            let theta_rad = angle_2d(&diff);
            let q1 = normalise(&diff)?.into_inner();
            let to_tangent = rot_z(FRAC_PI_2) * q1 * r;

            let arc_s_rad = sweep(theta_rad + FRAC_PI_2, chi_s + FRAC_PI_2);
            let arc_e_rad = sweep(chi_e + FRAC_PI_2, theta_rad + FRAC_PI_2);

            Some(CaseGeometry {
                case,
                length_m: ell_m + r * (arc_s_rad + arc_e_rad),
                centre_s: c_s,
                centre_e: c_e,
                arc_s_rad,
                arc_e_rad,
                q1,
                z1: c_s + to_tangent,
                z2: c_e + to_tangent,
                theta_rad,
                ell_m,
            })
        }
    }
}

/// Length of the inner (crossing) tangent between two circles of radius `r`
/// whose centres are `ell_m` apart.
///
/// Returns `None` when the circles are too close for an inner tangent to
/// exist, which is also when `2r / ell` leaves the domain of asin and acos.
fn inner_tangent_length(ell_m: f64, r: f64) -> Option<f64> {
    let radicand = ell_m * ell_m - 4.0 * r * r;

    if radicand < 0.0 || ell_m <= 0.0 {
        None
    }
    else {
        Some(radicand.sqrt())
    }
}
