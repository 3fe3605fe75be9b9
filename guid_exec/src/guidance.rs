//! # Guidance
//!
//! One guidance tick: the Dubins executor picks the path to fly and the path
//! follower turns it into commands for the inner loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
use crate::dubins_exec::{DubinsExec, DubinsExecError, DubinsExecParams, ExecInput, ExecOutput};
use crate::path::Configuration;
use crate::path_follow::{FollowOutput, PathFollowParams, PathFollower};
use util::{maths::get_ang_dist_2pi, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the whole guidance layer
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GuidanceParams {
    /// Period between guidance ticks
    pub period_s: f64,

    pub path_follow: PathFollowParams,

    pub dubins_exec: DubinsExecParams,
}

/// Everything the inner loop needs from one tick.
#[derive(Debug, Clone, Serialize)]
pub struct GuidanceOutput {
    /// The executor's command and leg state
    pub exec: ExecOutput,

    /// The follower's output for that command
    pub follow: FollowOutput,

    /// Signed angle from the vehicle course to the commanded course
    pub course_error_rad: f64,
}

pub struct Guidance {
    params: GuidanceParams,
    exec: DubinsExec,
    follower: PathFollower,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Guidance period must be positive, got {0} s")]
    InvalidPeriod(f64),

    #[error("Dubins executor error: {0}")]
    ExecError(DubinsExecError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Guidance {
    /// Initialise guidance from a parameter file.
    pub fn init(params_path: &str) -> Result<Self, GuidanceError> {
        let params = params::load(params_path).map_err(GuidanceError::ParamLoadError)?;

        Self::new(params)
    }

    pub fn new(params: GuidanceParams) -> Result<Self, GuidanceError> {
        if params.period_s.is_nan() || params.period_s <= 0.0 {
            return Err(GuidanceError::InvalidPeriod(params.period_s));
        }

        Ok(Self {
            params,
            exec: DubinsExec::new(params.dubins_exec),
            follower: PathFollower::new(params.path_follow),
        })
    }

    /// Run a single guidance tick.
    pub fn step(
        &mut self,
        waypoints_m_ned: &[Vector3<f64>],
        courses_rad: &[f64],
        config: &Configuration,
        new_path: bool,
    ) -> Result<GuidanceOutput, GuidanceError> {
        let exec = self
            .exec
            .proc(&ExecInput {
                waypoints_m_ned,
                courses_rad,
                config: *config,
                new_path,
            })
            .map_err(GuidanceError::ExecError)?;

        let follow = self.follower.follow(&exec.cmd, config);
        let course_error_rad = get_ang_dist_2pi(config.course_rad, follow.course_cmd_rad);

        debug!(
            "Guidance tick: leg {}, mode {}, e = {:.2} m, course error {:.3} rad",
            exec.leg_index,
            exec.mode.number(),
            follow.crosstrack_m,
            course_error_rad
        );

        Ok(GuidanceOutput {
            exec,
            follow,
            course_error_rad,
        })
    }

    pub fn params(&self) -> &GuidanceParams {
        &self.params
    }

    pub fn exec(&self) -> &DubinsExec {
        &self.exec
    }

    /// Restart the waypoint chain from the first leg.
    pub fn reset(&mut self) {
        self.exec.reset();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dubins_exec::DubinsExecMode;
    use crate::path::PathSpec;
    use std::f64::consts::FRAC_PI_2;

    const PARAMS: &str = r#"
period_s = 0.1

[path_follow]
k_path = 0.02
chi_inf_rad = 1.5708
k_orbit = 3.0

[dubins_exec]
turn_radius_m = 100.0
"#;

    #[test]
    fn test_params_from_toml() {
        let p: GuidanceParams = params::load_str(PARAMS).unwrap();
        assert_eq!(p.period_s, 0.1);
        assert_eq!(p.path_follow.k_orbit, 3.0);
        assert_eq!(p.dubins_exec.turn_radius_m, 100.0);

        let bad = GuidanceParams {
            period_s: 0.0,
            ..p
        };
        assert!(matches!(
            Guidance::new(bad),
            Err(GuidanceError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_init_missing_file() {
        assert!(matches!(
            Guidance::init("no_such_guidance_params.toml"),
            Err(GuidanceError::ParamLoadError(_))
        ));
    }

    #[test]
    fn test_step_follows_exec_command() {
        let mut guid = Guidance::new(params::load_str(PARAMS).unwrap()).unwrap();

        let wps = vec![
            Vector3::new(0.0, 0.0, -100.0),
            Vector3::new(0.0, 1000.0, -100.0),
            Vector3::new(1000.0, 1000.0, -100.0),
        ];
        let courses = vec![FRAC_PI_2, FRAC_PI_2, 0.0];

        // Starting at the first waypoint flying east
        let config = Configuration::new(wps[0], FRAC_PI_2);
        let out = guid.step(&wps, &courses, &config, true).unwrap();

        assert_eq!(out.exec.leg_index, 1);
        match out.exec.cmd {
            PathSpec::Orbit(orbit) => assert_eq!(orbit, out.exec.dubins.start_orbit()),
            _ => panic!("Expected an orbit command"),
        }

        // On the start circle, tangent to it, so no correction
        assert!(out.follow.crosstrack_m.abs() < 1e-9);
        assert!(out.course_error_rad.abs() < 1e-9);
        assert!((out.follow.altitude_cmd_m - 100.0).abs() < 1e-9);

        // The executor's state is kept between ticks
        assert_eq!(guid.exec().state().mode, out.exec.mode);
        guid.reset();
        assert_eq!(guid.exec().state().mode, DubinsExecMode::StartOrbitApproach);
    }

    #[test]
    fn test_step_propagates_exec_error() {
        let mut guid = Guidance::new(params::load_str(PARAMS).unwrap()).unwrap();
        let wps = vec![Vector3::zeros(); 2];

        let res = guid.step(&wps, &[0.0, 0.0], &Configuration::default(), false);
        assert!(matches!(res, Err(GuidanceError::ExecError(_))));
    }
}
