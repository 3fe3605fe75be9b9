//! # Mission
//!
//! A mission is the chain of oriented waypoints flown by the Dubins executor,
//! loaded from a TOML file of the form:
//!
//! ```toml
//! [[waypoints]]
//! position_m_ned = [0.0, 0.0, -100.0]
//! course_deg = 0.0
//!
//! [[waypoints]]
//! position_m_ned = [1000.0, 0.0, -100.0]
//! course_rad = 1.5708
//! ```
//!
//! Each waypoint gives its course in exactly one of degrees or radians.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::Path;
use std::str::FromStr;

// External
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
use crate::dubins::{self, DubinsError, DubinsPath};
use crate::path::Configuration;
use util::params::{self, LoadError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A waypoint as written in a mission file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaypointDesc {
    pub position_m_ned: [f64; 3],

    #[serde(default)]
    pub course_deg: Option<f64>,

    #[serde(default)]
    pub course_rad: Option<f64>,
}

/// The contents of a mission file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionFile {
    pub waypoints: Vec<WaypointDesc>,
}

/// A validated mission, in the form the executor takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub waypoints_m_ned: Vec<Vector3<f64>>,

    pub courses_rad: Vec<f64>,
}

/// Every leg of a mission planned up front.
#[derive(Debug, Clone, Serialize)]
pub struct MissionPlan {
    /// The path of each leg, `legs[k]` joins waypoints `k` and `k + 1`
    pub legs: Vec<DubinsPath>,

    pub total_length_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("Could not load the mission file: {0}")]
    LoadError(LoadError),

    #[error("A mission needs at least 3 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("Waypoint {0} has no course, give one of course_deg or course_rad")]
    MissingCourse(usize),

    #[error("Waypoint {0} gives both course_deg and course_rad")]
    AmbiguousCourse(usize),

    #[error("Leg {leg} could not be planned: {source}")]
    LegInfeasible { leg: usize, source: DubinsError },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Mission {
    /// Load a mission from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MissionError> {
        let file: MissionFile = params::load_path(path).map_err(MissionError::LoadError)?;

        Self::from_desc(&file)
    }

    /// Build a mission from the waypoint descriptions.
    pub fn from_desc(file: &MissionFile) -> Result<Self, MissionError> {
        if file.waypoints.len() < 3 {
            return Err(MissionError::TooFewWaypoints(file.waypoints.len()));
        }

        let mut waypoints_m_ned = Vec::with_capacity(file.waypoints.len());
        let mut courses_rad = Vec::with_capacity(file.waypoints.len());

        for (i, wp) in file.waypoints.iter().enumerate() {
            let course_rad = match (wp.course_deg, wp.course_rad) {
                (Some(d), None) => d.to_radians(),
                (None, Some(r)) => r,
                (None, None) => return Err(MissionError::MissingCourse(i)),
                (Some(_), Some(_)) => return Err(MissionError::AmbiguousCourse(i)),
            };

            waypoints_m_ned.push(Vector3::from(wp.position_m_ned));
            courses_rad.push(course_rad);
        }

        Ok(Self {
            waypoints_m_ned,
            courses_rad,
        })
    }

    pub fn num_legs(&self) -> usize {
        self.waypoints_m_ned.len().saturating_sub(1)
    }

    /// The start configuration of each leg followed by the end of the last.
    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.waypoints_m_ned
            .iter()
            .zip(self.courses_rad.iter())
            .map(|(p, c)| Configuration::new(*p, *c))
    }

    /// Plan every leg with the given turn radius.
    ///
    /// Fails on the first leg which cannot be planned.
    pub fn plan_legs(&self, radius_m: f64) -> Result<MissionPlan, MissionError> {
        let configs: Vec<Configuration> = self.configurations().collect();

        let mut legs = Vec::with_capacity(self.num_legs());
        for (k, pair) in configs.windows(2).enumerate() {
            let path = dubins::plan(&pair[0], &pair[1], radius_m)
                .map_err(|source| MissionError::LegInfeasible { leg: k + 1, source })?;

            debug!(
                "Leg {}: {:?}, {:.1} m",
                k + 1,
                path.case,
                path.length_m
            );

            legs.push(path);
        }

        let total_length_m = legs.iter().map(|l| l.length_m).sum();

        Ok(MissionPlan {
            legs,
            total_length_m,
        })
    }
}

impl FromStr for Mission {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let file: MissionFile = params::load_str(s).map_err(MissionError::LoadError)?;

        Self::from_desc(&file)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const BOX: &str = r#"
[[waypoints]]
position_m_ned = [0.0, 0.0, -100.0]
course_deg = 0.0

[[waypoints]]
position_m_ned = [1000.0, 0.0, -100.0]
course_deg = 90.0

[[waypoints]]
position_m_ned = [1000.0, 1000.0, -100.0]
course_rad = 3.141592653589793
"#;

    #[test]
    fn test_parse() {
        let m: Mission = BOX.parse().unwrap();

        assert_eq!(m.waypoints_m_ned.len(), 3);
        assert_eq!(m.num_legs(), 2);
        assert_eq!(m.waypoints_m_ned[1], Vector3::new(1000.0, 0.0, -100.0));
        assert!((m.courses_rad[1] - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(m.courses_rad[2], PI);
    }

    #[test]
    fn test_course_validation() {
        let missing = BOX.replace("course_deg = 90.0", "");
        assert!(matches!(
            missing.parse::<Mission>(),
            Err(MissionError::MissingCourse(1))
        ));

        let both = BOX.replace("course_deg = 90.0", "course_deg = 90.0\ncourse_rad = 1.0");
        assert!(matches!(
            both.parse::<Mission>(),
            Err(MissionError::AmbiguousCourse(1))
        ));

        let short = MissionFile {
            waypoints: vec![],
        };
        assert!(matches!(
            Mission::from_desc(&short),
            Err(MissionError::TooFewWaypoints(0))
        ));

        assert!(matches!(
            "waypoints = 3".parse::<Mission>(),
            Err(MissionError::LoadError(_))
        ));
    }

    #[test]
    fn test_plan_legs() {
        let m: Mission = BOX.parse().unwrap();
        let plan = m.plan_legs(100.0).unwrap();

        assert_eq!(plan.legs.len(), 2);
        let sum: f64 = plan.legs.iter().map(|l| l.length_m).sum();
        assert!((plan.total_length_m - sum).abs() < 1e-9);

        // Legs join end to start
        assert_eq!(plan.legs[0].end, plan.legs[1].start);
        assert_eq!(plan.legs[1].end.position_m_ned, m.waypoints_m_ned[2]);
    }

    #[test]
    fn test_infeasible_leg_reported() {
        let m: Mission = BOX
            .replace("[1000.0, 1000.0, -100.0]", "[1000.0, 200.0, -100.0]")
            .parse()
            .unwrap();

        match m.plan_legs(100.0) {
            Err(MissionError::LegInfeasible { leg, source }) => {
                assert_eq!(leg, 2);
                assert!(matches!(source, DubinsError::InfeasibleGeometry { .. }));
            }
            other => panic!("Expected an infeasible leg, got {:?}", other.map(|p| p.legs.len())),
        }
    }
}
