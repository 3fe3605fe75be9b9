//! Dubins path description

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::f64::consts::FRAC_PI_2;

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
use crate::path::{Configuration, LineSegment, OrbitDir, OrbitSegment};
use util::maths::{angle_2d, in_half_plane};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A half space bounded by a plane through `point_m_ned` with normal `normal`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfPlane {
    pub point_m_ned: Vector3<f64>,
    pub normal: Vector3<f64>,
}

/// The four turn circle centres considered by the planner.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnCircles {
    /// Right (clockwise) circle at the start configuration
    pub right_s_m_ned: Vector3<f64>,

    /// Left (counter-clockwise) circle at the start configuration
    pub left_s_m_ned: Vector3<f64>,

    /// Right (clockwise) circle at the end configuration
    pub right_e_m_ned: Vector3<f64>,

    /// Left (counter-clockwise) circle at the end configuration
    pub left_e_m_ned: Vector3<f64>,
}

/// A planned Dubins path between two configurations.
///
/// The path is flown as an arc on the start circle until H1, a straight line
/// from H1 to H2, and an arc on the end circle until H3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DubinsPath {
    /// Configuration the path starts from
    pub start: Configuration,

    /// Configuration the path ends at
    pub end: Configuration,

    /// Turn radius the path was planned with
    pub radius_m: f64,

    /// Total length of the path
    pub length_m: f64,

    /// The case selected as shortest
    pub case: DubinsCase,

    /// Lengths of each case, indexed by [`DubinsCase::index`]. Cases which
    /// have no valid tangent are `None`.
    pub lengths_m: [Option<f64>; 4],

    /// Centre of the start circle
    pub centre_s_m_ned: Vector3<f64>,

    /// Direction of the start circle
    pub dir_s: OrbitDir,

    /// Centre of the end circle
    pub centre_e_m_ned: Vector3<f64>,

    /// Direction of the end circle
    pub dir_e: OrbitDir,

    /// Angle swept on the start circle
    pub arc_s_rad: f64,

    /// Angle swept on the end circle
    pub arc_e_rad: f64,

    /// Switching half plane from the start arc onto the line
    pub h1: HalfPlane,

    /// Switching half plane from the line onto the end arc
    pub h2: HalfPlane,

    /// Terminal half plane at the end configuration
    pub h3: HalfPlane,

    /// Bearing from the start circle centre to the end circle centre
    pub theta_rad: f64,

    /// Distance between the start and end circle centres
    pub ell_m: f64,

    /// All candidate circle centres
    pub circles: TurnCircles,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// The four start circle - straight - end circle combinations, in the order
/// they are compared in (lower index wins a tie).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DubinsCase {
    /// Right - Straight - Right
    Rsr,

    /// Right - Straight - Left
    Rsl,

    /// Left - Straight - Right
    Lsr,

    /// Left - Straight - Left
    Lsl,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HalfPlane {
    pub fn new(point_m_ned: Vector3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point_m_ned,
            normal,
        }
    }

    /// Returns true if `position` is in the (closed) half space.
    pub fn contains(&self, position_m_ned: &Vector3<f64>) -> bool {
        in_half_plane(position_m_ned, &self.point_m_ned, &self.normal)
    }

    /// The complementary half space, sharing the same boundary.
    pub fn flipped(&self) -> Self {
        Self {
            point_m_ned: self.point_m_ned,
            normal: -self.normal,
        }
    }
}

impl DubinsCase {
    pub const ALL: [DubinsCase; 4] = [
        DubinsCase::Rsr,
        DubinsCase::Rsl,
        DubinsCase::Lsr,
        DubinsCase::Lsl,
    ];

    pub fn index(self) -> usize {
        match self {
            DubinsCase::Rsr => 0,
            DubinsCase::Rsl => 1,
            DubinsCase::Lsr => 2,
            DubinsCase::Lsl => 3,
        }
    }

    /// Directions of the start and end circles for this case.
    pub fn dirs(self) -> (OrbitDir, OrbitDir) {
        let (r, l) = (OrbitDir::Clockwise, OrbitDir::CounterClockwise);
        match self {
            DubinsCase::Rsr => (r, r),
            DubinsCase::Rsl => (r, l),
            DubinsCase::Lsr => (l, r),
            DubinsCase::Lsl => (l, l),
        }
    }
}

impl DubinsPath {
    /// Unit vector along the straight segment, the normal of H1 and H2.
    pub fn q1(&self) -> Vector3<f64> {
        self.h1.normal
    }

    /// The orbit to fly at the start of the path.
    pub fn start_orbit(&self) -> OrbitSegment {
        OrbitSegment {
            centre_m_ned: self.centre_s_m_ned,
            radius_m: self.radius_m,
            dir: self.dir_s,
        }
    }

    /// The straight segment, from H1 along q1.
    pub fn line(&self) -> LineSegment {
        LineSegment {
            origin_m_ned: self.h1.point_m_ned,
            direction: self.h1.normal,
        }
    }

    /// The orbit to fly at the end of the path.
    pub fn end_orbit(&self) -> OrbitSegment {
        OrbitSegment {
            centre_m_ned: self.centre_e_m_ned,
            radius_m: self.radius_m,
            dir: self.dir_e,
        }
    }

    /// Length of the straight segment.
    pub fn line_length_m(&self) -> f64 {
        (self.h2.point_m_ned - self.h1.point_m_ned).norm()
    }

    /// Sample configurations along the path, spaced by at most `step_m` along
    /// each segment.
    ///
    /// The first sample is the start configuration and the last is the end
    /// configuration. A non-positive step gives one sample per segment.
    pub fn sample(&self, step_m: f64) -> Vec<Configuration> {
        let mut samples = Vec::new();

        // Start arc
        sample_arc(
            &mut samples,
            &self.start_orbit(),
            &self.start.position_m_ned,
            self.arc_s_rad,
            step_m,
        );

        // Straight line
        let z1 = self.h1.point_m_ned;
        let delta = self.h2.point_m_ned - z1;
        let course_rad = angle_2d(&self.q1());
        let n = num_steps(delta.norm(), step_m);
        for i in 0..n {
            samples.push(Configuration::new(z1 + delta * (i as f64 / n as f64), course_rad));
        }

        // End arc
        sample_arc(
            &mut samples,
            &self.end_orbit(),
            &self.h2.point_m_ned,
            self.arc_e_rad,
            step_m,
        );

        samples.push(self.end);

        samples
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Number of samples to take along a segment, zero for an empty segment.
fn num_steps(length_m: f64, step_m: f64) -> usize {
    if length_m <= 0.0 {
        0
    }
    else if step_m > 0.0 {
        (length_m / step_m).ceil() as usize
    }
    else {
        1
    }
}

/// Push samples along an arc starting at `from`, not including the end of the
/// arc.
fn sample_arc(
    samples: &mut Vec<Configuration>,
    orbit: &OrbitSegment,
    from_m_ned: &Vector3<f64>,
    sweep_rad: f64,
    step_m: f64,
) {
    let c = orbit.centre_m_ned;
    let lambda = orbit.dir.sign();
    let phi_0 = angle_2d(&(from_m_ned - c));

    let n = num_steps(sweep_rad * orbit.radius_m, step_m);
    for i in 0..n {
        let phi = phi_0 + lambda * sweep_rad * (i as f64 / n as f64);
        let pos = c + Vector3::new(phi.cos(), phi.sin(), 0.0) * orbit.radius_m;
        samples.push(Configuration::new(pos, phi + lambda * FRAC_PI_2));
    }
}
