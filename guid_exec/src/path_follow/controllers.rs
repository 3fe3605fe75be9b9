//! # Path following controllers
//!
//! This module provides the straight line and orbit following laws, including
//! their error calculations.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::convert::TryFrom;
use std::f64::consts::{FRAC_PI_2, PI};

use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::PathFollowParams;
use crate::path::*;
use util::maths::{angle_2d, horizontal_dist, normalise, wrap_to_band};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Output of one path following calculation.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
pub struct FollowOutput {
    /// Crosstrack error to the path
    pub crosstrack_m: f64,

    /// Commanded course angle
    pub course_cmd_rad: f64,

    /// Commanded altitude (positive up)
    pub altitude_cmd_m: f64,
}

/// The path follower, applying the line or orbit law depending on the path
/// being followed.
#[derive(Debug, Serialize, Clone)]
pub struct PathFollower {
    params: PathFollowParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathFollower {
    /// Create a new follower from the parameters
    pub fn new(params: PathFollowParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PathFollowParams {
        &self.params
    }

    /// Get the commands to follow the given path from the given configuration.
    pub fn follow(&self, path: &PathSpec, config: &Configuration) -> FollowOutput {
        let out = match path {
            PathSpec::Line(line) => {
                follow_line(line, config, self.params.chi_inf_rad, self.params.k_path)
            }
            PathSpec::Orbit(orbit) => follow_orbit(orbit, config, self.params.k_orbit),
        };

        trace!(
            "{:?} follow: e = {:.3} m, chi_c = {:.4} rad, h_c = {:.2} m",
            path.path_type(),
            out.crosstrack_m,
            out.course_cmd_rad,
            out.altitude_cmd_m
        );

        out
    }

    /// Follow a path selected by its raw type flag.
    ///
    /// Only the segment matching the flag is used, the other may be `None`.
    pub fn follow_flagged(
        &self,
        flag: i32,
        line: Option<&LineSegment>,
        orbit: Option<&OrbitSegment>,
        config: &Configuration,
    ) -> Result<FollowOutput, PathError> {
        let spec = match PathType::try_from(flag)? {
            PathType::Line => PathSpec::Line(*line.ok_or(PathError::MissingSegment(PathType::Line))?),
            PathType::Orbit => {
                PathSpec::Orbit(*orbit.ok_or(PathError::MissingSegment(PathType::Orbit))?)
            }
        };

        Ok(self.follow(&spec, config))
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Straight line following law.
///
/// The crosstrack error is positive when the vehicle is to the right of the
/// line (looking along its direction).
pub fn follow_line(
    line: &LineSegment,
    config: &Configuration,
    chi_inf_rad: f64,
    k_path: f64,
) -> FollowOutput {
    let q = &line.direction;
    let r = &line.origin_m_ned;
    let p = &config.position_m_ned;

    // Course of the line, taken to the same turn as the vehicle's course so
    // the commanded course doesn't take the long way round
    let chi_q = wrap_to_band(angle_2d(q), config.course_rad);

    let e_p = p - r;
    let crosstrack_m = -chi_q.sin() * e_p[0] + chi_q.cos() * e_p[1];

    let course_cmd_rad = chi_q - chi_inf_rad * (2.0 / PI) * (k_path * crosstrack_m).atan();

    // Project the relative position onto the vertical plane containing the
    // line, the horizontal distance along that plane then sets the altitude
    let q_ne = q[0].hypot(q[1]);
    let altitude_cmd_m = match normalise(&q.cross(&Vector3::z())) {
        Some(n) if q_ne > 0.0 => {
            let s = e_p - e_p.dot(&n) * n.into_inner();
            let q_s = q[2] / q_ne;

            // q_d is positive down, so a climbing line has q_s < 0
            -r[2] - s[0].hypot(s[1]) * q_s
        }
        _ => -r[2],
    };

    FollowOutput {
        crosstrack_m,
        course_cmd_rad,
        altitude_cmd_m,
    }
}

/// Orbit following law.
///
/// The crosstrack error is the distance outside the orbit circle, negative
/// when inside it.
pub fn follow_orbit(orbit: &OrbitSegment, config: &Configuration, k_orbit: f64) -> FollowOutput {
    let c = &orbit.centre_m_ned;
    let p = &config.position_m_ned;
    let rho = orbit.radius_m;

    let d = horizontal_dist(p, c);

    // Angular position of the vehicle around the orbit
    let phi = wrap_to_band((p[1] - c[1]).atan2(p[0] - c[0]), config.course_rad);

    let crosstrack_m = d - rho;
    let course_cmd_rad =
        phi + orbit.dir.sign() * (FRAC_PI_2 + (k_orbit * (d - rho) / rho).atan());

    FollowOutput {
        crosstrack_m,
        course_cmd_rad,
        altitude_cmd_m: -c[2],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn straight_example() -> (LineSegment, Configuration) {
        (
            LineSegment::new(
                Vector3::new(-1000.0, 0.0, -500.0),
                Vector3::new(0.7044, 0.7044, 0.0872),
            )
            .unwrap(),
            Configuration::new(Vector3::new(0.0, 0.0, -500.0), 3.2687e-18),
        )
    }

    fn orbit_example() -> (OrbitSegment, Configuration) {
        (
            OrbitSegment::new(Vector3::new(0.0, 1000.0, -600.0), 200.0, OrbitDir::Clockwise)
                .unwrap(),
            Configuration::new(Vector3::new(0.875, 0.0, 0.0), 0.0),
        )
    }

    #[test]
    fn test_line_example() {
        let (line, config) = straight_example();
        let out = follow_line(&line, &config, FRAC_PI_2, 0.02);

        assert!((out.crosstrack_m - -707.1068).abs() < 1e-4, "e = {}", out.crosstrack_m);
        assert!((out.course_cmd_rad - 2.2856).abs() < 1e-4, "chi_c = {}", out.course_cmd_rad);
        // The line descends by 0.0872 per unit length, 707.1 m along it from
        // the origin gives 61.86 m below 500 m
        assert!((out.altitude_cmd_m - 438.1362).abs() < 0.1, "h_c = {}", out.altitude_cmd_m);
    }

    #[test]
    fn test_orbit_example() {
        let (orbit, config) = orbit_example();
        let out = follow_orbit(&orbit, &config, 3.0);

        assert!((out.crosstrack_m - 800.0).abs() < 1e-3, "e = {}", out.crosstrack_m);
        assert!((out.course_cmd_rad - 1.4877).abs() < 0.01, "chi_c = {}", out.course_cmd_rad);
        assert_eq!(out.altitude_cmd_m, 600.0);
    }

    #[test]
    fn test_on_line_commands_line_course() {
        // Flying due east along a level line at 100 m
        let line = LineSegment::new(Vector3::new(0.0, 0.0, -100.0), Vector3::y()).unwrap();
        let config = Configuration::new(Vector3::new(0.0, 50.0, -100.0), FRAC_PI_2);

        let out = follow_line(&line, &config, 1.0, 0.05);
        assert!(out.crosstrack_m.abs() < 1e-12);
        assert!((out.course_cmd_rad - FRAC_PI_2).abs() < 1e-12);
        assert!((out.altitude_cmd_m - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_sloped_line_altitude_tracks_line() {
        use crate::dubins::{self, DubinsCase};

        // Same course at both ends, 100 m higher at the end
        let start = Configuration::new(Vector3::new(0.0, 0.0, -100.0), 0.0);
        let end = Configuration::new(Vector3::new(1000.0, 0.0, -200.0), 0.0);
        let path = dubins::plan(&start, &end, 150.0).unwrap();

        assert!(matches!(path.case, DubinsCase::Rsr | DubinsCase::Lsl));
        let line = path.line();
        assert!(line.direction[2] < 0.0, "q1 = {:?}", line.direction);

        let z1 = path.h1.point_m_ned;
        let z2 = path.h2.point_m_ned;

        for &frac in &[0.0, 0.5, 1.0] {
            // Vehicle on the line, then 20 m to the side of it at the same
            // altitude: the command is the altitude of the line abeam
            let on_line = z1 + (z2 - z1) * frac;
            let side = Vector3::new(-line.direction[1], line.direction[0], 0.0).normalize();

            for &offset in &[0.0, 20.0] {
                let config = Configuration::new(on_line + side * offset, angle_2d(&line.direction));
                let out = follow_line(&line, &config, FRAC_PI_2, 0.02);

                assert!(
                    (out.altitude_cmd_m + on_line[2]).abs() < 1e-6,
                    "frac {}: h_c = {}, line altitude = {}",
                    frac,
                    out.altitude_cmd_m,
                    -on_line[2]
                );
            }
        }

        // Swapping the altitudes gives a descending line
        let start = Configuration::new(Vector3::new(0.0, 0.0, -200.0), 0.0);
        let end = Configuration::new(Vector3::new(1000.0, 0.0, -100.0), 0.0);
        let path = dubins::plan(&start, &end, 150.0).unwrap();
        let line = path.line();
        assert!(line.direction[2] > 0.0);

        let config = Configuration::new(path.h2.point_m_ned, angle_2d(&line.direction));
        let out = follow_line(&line, &config, FRAC_PI_2, 0.02);
        assert!((out.altitude_cmd_m + path.h2.point_m_ned[2]).abs() < 1e-6);
    }

    #[test]
    fn test_line_correction_saturates() {
        let line = LineSegment::new(Vector3::zeros(), Vector3::x()).unwrap();
        let chi_inf = 1.0;

        // Far to the right of a northbound line: turn left by nearly chi_inf
        let right = Configuration::new(Vector3::new(0.0, 1e6, 0.0), 0.0);
        let out = follow_line(&line, &right, chi_inf, 0.05);
        assert!(out.crosstrack_m > 0.0);
        assert!(out.course_cmd_rad < 0.0 && out.course_cmd_rad > -chi_inf);
        assert!((out.course_cmd_rad + chi_inf).abs() < 1e-4);

        // And the other way on the left
        let left = Configuration::new(Vector3::new(0.0, -1e6, 0.0), 0.0);
        let out = follow_line(&line, &left, chi_inf, 0.05);
        assert!((out.course_cmd_rad - chi_inf).abs() < 1e-4);
    }

    #[test]
    fn test_line_course_wrapped_to_vehicle() {
        // Line heading just west of south, vehicle heading just east of south.
        let line = LineSegment::new(
            Vector3::zeros(),
            Vector3::new(-1.0, -0.01, 0.0),
        )
        .unwrap();
        let config = Configuration::new(Vector3::zeros(), PI - 0.01);

        let out = follow_line(&line, &config, 1.0, 0.05);
        assert!((out.course_cmd_rad - config.course_rad).abs() < 0.05);
    }

    #[test]
    fn test_orbit_on_circle_tangent() {
        // On the circle due north of the centre, flying clockwise means east
        let orbit = OrbitSegment::new(Vector3::new(0.0, 0.0, -50.0), 100.0, OrbitDir::Clockwise)
            .unwrap();
        let config = Configuration::new(Vector3::new(100.0, 0.0, -50.0), FRAC_PI_2);

        let out = follow_orbit(&orbit, &config, 2.0);
        assert!(out.crosstrack_m.abs() < 1e-12);
        assert!((out.course_cmd_rad - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(out.altitude_cmd_m, 50.0);

        // Counter-clockwise from the same point means west
        let orbit = OrbitSegment {
            dir: OrbitDir::CounterClockwise,
            ..orbit
        };
        let config = Configuration::new(Vector3::new(100.0, 0.0, -50.0), -FRAC_PI_2);
        let out = follow_orbit(&orbit, &config, 2.0);
        assert!((out.course_cmd_rad + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_follower_dispatch() {
        let follower = PathFollower::new(PathFollowParams {
            k_path: 0.02,
            chi_inf_rad: FRAC_PI_2,
            k_orbit: 3.0,
        });

        let (line, line_config) = straight_example();
        let (orbit, orbit_config) = orbit_example();

        assert_eq!(
            follower.follow(&PathSpec::Line(line), &line_config),
            follow_line(&line, &line_config, FRAC_PI_2, 0.02)
        );
        assert_eq!(
            follower.follow_flagged(2, None, Some(&orbit), &orbit_config),
            Ok(follow_orbit(&orbit, &orbit_config, 3.0))
        );
        assert_eq!(
            follower.follow_flagged(3, Some(&line), Some(&orbit), &orbit_config),
            Err(PathError::InvalidPathType(3))
        );
        assert_eq!(
            follower.follow_flagged(1, None, Some(&orbit), &orbit_config),
            Err(PathError::MissingSegment(PathType::Line))
        );
    }
}
