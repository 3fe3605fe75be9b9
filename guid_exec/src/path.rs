//! # Path
//!
//! This module defines the path types passed between the guidance modules and
//! on to the inner control loop.
//!
//! All positions are in the North-East-Down (NED) frame and all course angles
//! are measured from North towards East.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::convert::TryFrom;

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use util::maths::{heading_vec, normalise};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An oriented vehicle configuration: where the vehicle is and which way it
/// is flying.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Position in the NED frame
    pub position_m_ned: Vector3<f64>,

    /// Course angle
    pub course_rad: f64,
}

/// A straight line path.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// A point on the line
    pub origin_m_ned: Vector3<f64>,

    /// Unit vector along the line. A non-zero down component encodes the
    /// descent (positive) or climb (negative) slope of the line.
    pub direction: Vector3<f64>,
}

/// A circular orbit path at constant altitude.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitSegment {
    /// Centre of the orbit, the down component sets the orbit altitude
    pub centre_m_ned: Vector3<f64>,

    /// Radius of the orbit
    pub radius_m: f64,

    /// Direction the orbit is flown in
    pub dir: OrbitDir,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Direction of travel around an orbit, viewed from above.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitDir {
    Clockwise,
    CounterClockwise,
}

/// A path for the follower to track.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathSpec {
    Line(LineSegment),
    Orbit(OrbitSegment),
}

/// The path type flag used by the inner loop to select a tracking law.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathType {
    Line = 1,
    Orbit = 2,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PathError {
    #[error("Invalid path type flag {0}, expected 1 (line) or 2 (orbit)")]
    InvalidPathType(i32),

    #[error("A {0:?} path was selected but no segment of that type was given")]
    MissingSegment(PathType),

    #[error("Line direction has no horizontal component")]
    DegenerateDirection,

    #[error("Orbit radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Orbit direction must be +1 or -1, got {0}")]
    InvalidOrbitDir(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Configuration {
    pub fn new(position_m_ned: Vector3<f64>, course_rad: f64) -> Self {
        Self {
            position_m_ned,
            course_rad,
        }
    }

    /// Horizontal unit vector pointing along the course.
    pub fn course_vec(&self) -> Vector3<f64> {
        heading_vec(self.course_rad)
    }
}

impl LineSegment {
    /// Create a new line, normalising the direction.
    ///
    /// Vertical lines cannot be followed and are rejected.
    pub fn new(origin_m_ned: Vector3<f64>, direction: Vector3<f64>) -> Result<Self, PathError> {
        if direction[0].hypot(direction[1]) <= util::maths::NORMALISE_EPSILON {
            return Err(PathError::DegenerateDirection);
        }

        let direction = normalise(&direction)
            .ok_or(PathError::DegenerateDirection)?
            .into_inner();

        Ok(Self {
            origin_m_ned,
            direction,
        })
    }
}

impl OrbitSegment {
    pub fn new(
        centre_m_ned: Vector3<f64>,
        radius_m: f64,
        dir: OrbitDir,
    ) -> Result<Self, PathError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(PathError::InvalidRadius(radius_m));
        }

        Ok(Self {
            centre_m_ned,
            radius_m,
            dir,
        })
    }
}

impl OrbitDir {
    /// The orbit direction as a sign, +1 for clockwise, -1 for
    /// counter-clockwise.
    pub fn sign(self) -> f64 {
        match self {
            OrbitDir::Clockwise => 1.0,
            OrbitDir::CounterClockwise => -1.0,
        }
    }

    /// Build an orbit direction from its sign.
    pub fn from_sign(lambda: f64) -> Result<Self, PathError> {
        if lambda == 1.0 {
            Ok(OrbitDir::Clockwise)
        } else if lambda == -1.0 {
            Ok(OrbitDir::CounterClockwise)
        } else {
            Err(PathError::InvalidOrbitDir(lambda))
        }
    }
}

impl PathSpec {
    pub fn path_type(&self) -> PathType {
        match self {
            PathSpec::Line(_) => PathType::Line,
            PathSpec::Orbit(_) => PathType::Orbit,
        }
    }
}

impl PathType {
    /// The numeric flag for this path type.
    pub fn flag(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for PathType {
    type Error = PathError;

    fn try_from(flag: i32) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(PathType::Line),
            2 => Ok(PathType::Orbit),
            f => Err(PathError::InvalidPathType(f)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_path_type_flags() {
        assert_eq!(PathType::try_from(1), Ok(PathType::Line));
        assert_eq!(PathType::try_from(2), Ok(PathType::Orbit));
        assert_eq!(PathType::try_from(0), Err(PathError::InvalidPathType(0)));
        assert_eq!(PathType::try_from(-1), Err(PathError::InvalidPathType(-1)));
        assert_eq!(PathType::Orbit.flag(), 2);
    }

    #[test]
    fn test_line_normalised() {
        let line = LineSegment::new(
            Vector3::new(-1000.0, 0.0, -500.0),
            Vector3::new(0.7044, 0.7044, 0.0872),
        )
        .unwrap();
        assert!((line.direction.norm() - 1.0).abs() < 1e-12);

        assert_eq!(
            LineSegment::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0)),
            Err(PathError::DegenerateDirection)
        );
    }

    #[test]
    fn test_orbit_validation() {
        assert!(OrbitSegment::new(Vector3::zeros(), 200.0, OrbitDir::Clockwise).is_ok());
        assert_eq!(
            OrbitSegment::new(Vector3::zeros(), 0.0, OrbitDir::Clockwise),
            Err(PathError::InvalidRadius(0.0))
        );
        assert!(OrbitSegment::new(Vector3::zeros(), f64::NAN, OrbitDir::Clockwise).is_err());
    }

    #[test]
    fn test_orbit_dir_sign() {
        assert_eq!(OrbitDir::from_sign(1.0), Ok(OrbitDir::Clockwise));
        assert_eq!(OrbitDir::from_sign(-1.0), Ok(OrbitDir::CounterClockwise));
        assert_eq!(OrbitDir::from_sign(0.0), Err(PathError::InvalidOrbitDir(0.0)));
        assert_eq!(OrbitDir::CounterClockwise.sign(), -1.0);
    }

    #[test]
    fn test_path_spec_serde_tagged() {
        let spec = PathSpec::Orbit(
            OrbitSegment::new(Vector3::new(0.0, 1000.0, -600.0), 200.0, OrbitDir::Clockwise)
                .unwrap(),
        );
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"type\":\"Orbit\""));

        let back: PathSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
        assert_eq!(back.path_type(), PathType::Orbit);
    }
}
