//! Dubins executor parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the Dubins executor
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DubinsExecParams {
    /// Turn radius used to plan every leg
    pub turn_radius_m: f64,
}
