//! Path following parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for path following
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PathFollowParams {
    /// Straight line convergence gain. Larger values turn onto the line more
    /// sharply.
    pub k_path: f64,

    /// Course correction commanded when infinitely far from a line. Should be
    /// in (0, pi/2].
    pub chi_inf_rad: f64,

    /// Orbit convergence gain
    pub k_orbit: f64,
}
