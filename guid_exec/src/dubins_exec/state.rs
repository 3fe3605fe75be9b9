//! Dubins executor state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::DubinsExecParams;
use crate::dubins::{self, DubinsError, DubinsPath};
use crate::path::{Configuration, PathSpec};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The persistent state of the executor: which leg is being flown and which
/// part of that leg.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GuidanceState {
    /// Index of the waypoint at the end of the current leg. The leg starts at
    /// `leg_index - 1`.
    pub leg_index: usize,

    /// Current mode within the leg
    pub mode: DubinsExecMode,
}

/// Input data for one executor cycle.
#[derive(Debug, Clone, Copy)]
pub struct ExecInput<'a> {
    /// Waypoint positions
    pub waypoints_m_ned: &'a [Vector3<f64>],

    /// Desired course at each waypoint
    pub courses_rad: &'a [f64],

    /// Current vehicle configuration
    pub config: Configuration,

    /// If true the state is reset to the start of the first leg before
    /// processing
    pub new_path: bool,
}

/// Output of one executor cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ExecOutput {
    /// The path to follow this cycle
    pub cmd: PathSpec,

    /// Leg index after this cycle
    pub leg_index: usize,

    /// Mode after this cycle
    pub mode: DubinsExecMode,

    /// The path of the leg that was flown this cycle
    pub dubins: DubinsPath,
}

/// The Dubins executor, owning the guidance state of a single vehicle.
pub struct DubinsExec {
    params: DubinsExecParams,

    state: GuidanceState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The modes of a single leg, in the order they are flown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum DubinsExecMode {
    /// On the start circle, waiting to get behind H1
    StartOrbitApproach,

    /// On the start circle, waiting to cross H1
    StartOrbit,

    /// On the tangent line, waiting to cross H2
    Straight,

    /// On the end circle, waiting to get behind H3
    EndOrbitApproach,

    /// On the end circle, waiting to cross H3
    EndOrbit,
}

/// Problems with the waypoint lists given to the executor.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("At least 3 waypoints are required, got {0}")]
    NotEnoughWaypoints(usize),

    #[error("Got {num_waypoints} waypoints but {num_courses} courses")]
    LengthMismatch {
        num_waypoints: usize,
        num_courses: usize,
    },

    #[error("Leg index {leg_index} is outside a list of {num_waypoints} waypoints")]
    LegOutOfRange {
        leg_index: usize,
        num_waypoints: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum DubinsExecError {
    #[error("Invalid executor input: {0}")]
    InvalidInput(InputError),

    #[error("Could not plan the current leg: {0}")]
    Planning(DubinsError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GuidanceState {
    /// The state at the start of the first leg.
    pub fn new() -> Self {
        Self {
            leg_index: 1,
            mode: DubinsExecMode::StartOrbitApproach,
        }
    }

    /// Return to the start of the first leg.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GuidanceState {
    fn default() -> Self {
        Self::new()
    }
}

impl DubinsExecMode {
    /// The mode's number, 1 to 5.
    pub fn number(self) -> u8 {
        match self {
            DubinsExecMode::StartOrbitApproach => 1,
            DubinsExecMode::StartOrbit => 2,
            DubinsExecMode::Straight => 3,
            DubinsExecMode::EndOrbitApproach => 4,
            DubinsExecMode::EndOrbit => 5,
        }
    }
}

impl From<InputError> for DubinsExecError {
    fn from(e: InputError) -> Self {
        DubinsExecError::InvalidInput(e)
    }
}

impl From<DubinsError> for DubinsExecError {
    fn from(e: DubinsError) -> Self {
        DubinsExecError::Planning(e)
    }
}

impl DubinsExec {
    pub fn new(params: DubinsExecParams) -> Self {
        Self {
            params,
            state: GuidanceState::new(),
        }
    }

    /// Process one executor cycle.
    ///
    /// The state is left unchanged if the cycle fails.
    pub fn proc(&mut self, input: &ExecInput) -> Result<ExecOutput, DubinsExecError> {
        let prev = self.state;

        let output = follow_wpp_dubins(&mut self.state, input, self.params.turn_radius_m)?;

        if prev.leg_index != self.state.leg_index {
            info!(
                "Leg {} complete, now flying leg {}",
                prev.leg_index, self.state.leg_index
            );
        }
        if prev.mode != self.state.mode {
            info!(
                "Dubins exec mode {:?} ({}) -> {:?} ({})",
                prev.mode,
                prev.mode.number(),
                self.state.mode,
                self.state.mode.number()
            );
        }

        Ok(output)
    }

    pub fn params(&self) -> &DubinsExecParams {
        &self.params
    }

    pub fn state(&self) -> &GuidanceState {
        &self.state
    }

    /// Return to the start of the first leg on the next cycle.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run one cycle of Dubins waypoint following.
///
/// Plans the current leg, picks the command for the current mode, then moves
/// to the next mode if the vehicle has crossed that mode's switching plane.
/// The command returned is the one for the mode the cycle started in.
///
/// On error `state` is not modified, except for the reset requested by
/// `input.new_path`.
pub fn follow_wpp_dubins(
    state: &mut GuidanceState,
    input: &ExecInput,
    radius_m: f64,
) -> Result<ExecOutput, DubinsExecError> {
    let num_waypoints = input.waypoints_m_ned.len();

    if num_waypoints < 3 {
        return Err(InputError::NotEnoughWaypoints(num_waypoints).into());
    }
    if input.courses_rad.len() != num_waypoints {
        return Err(InputError::LengthMismatch {
            num_waypoints,
            num_courses: input.courses_rad.len(),
        }
        .into());
    }

    if input.new_path {
        state.reset();
    }

    let i = state.leg_index;
    if i == 0 || i >= num_waypoints {
        return Err(InputError::LegOutOfRange {
            leg_index: i,
            num_waypoints,
        }
        .into());
    }

    let start = Configuration::new(input.waypoints_m_ned[i - 1], input.courses_rad[i - 1]);
    let end = Configuration::new(input.waypoints_m_ned[i], input.courses_rad[i]);
    let path = dubins::plan(&start, &end, radius_m)?;

    let p = &input.config.position_m_ned;

    let (cmd, next_mode) = match state.mode {
        DubinsExecMode::StartOrbitApproach => (
            PathSpec::Orbit(path.start_orbit()),
            if path.h1.flipped().contains(p) {
                Some(DubinsExecMode::StartOrbit)
            } else {
                None
            },
        ),
        DubinsExecMode::StartOrbit => (
            PathSpec::Orbit(path.start_orbit()),
            if path.h1.contains(p) {
                Some(DubinsExecMode::Straight)
            } else {
                None
            },
        ),
        DubinsExecMode::Straight => (
            PathSpec::Line(path.line()),
            if path.h2.contains(p) {
                Some(DubinsExecMode::EndOrbitApproach)
            } else {
                None
            },
        ),
        DubinsExecMode::EndOrbitApproach => (
            PathSpec::Orbit(path.end_orbit()),
            if path.h3.flipped().contains(p) {
                Some(DubinsExecMode::EndOrbit)
            } else {
                None
            },
        ),
        DubinsExecMode::EndOrbit => (
            PathSpec::Orbit(path.end_orbit()),
            if path.h3.contains(p) {
                Some(DubinsExecMode::StartOrbitApproach)
            } else {
                None
            },
        ),
    };

    if let Some(mode) = next_mode {
        // Leaving the end orbit starts the next leg, the final leg is
        // repeated once reached
        if state.mode == DubinsExecMode::EndOrbit {
            state.leg_index = (i + 1).min(num_waypoints - 1);
        }
        state.mode = mode;
    }

    debug!(
        "Leg {} mode {}, {:?} path, {:.1} m long",
        state.leg_index,
        state.mode.number(),
        path.case,
        path.length_m
    );

    Ok(ExecOutput {
        cmd,
        leg_index: state.leg_index,
        mode: state.mode,
        dubins: path,
    })
}
