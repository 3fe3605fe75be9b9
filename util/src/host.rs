//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env::{self, VarError};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the software tree, which
/// contains the `params` and `sessions` directories.
pub const SW_ROOT_ENV_VAR: &str = "GUID_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the environment.
pub fn get_guid_sw_root() -> Result<PathBuf, VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Name of the machine the software is running on, if the platform reports
/// one.
pub fn get_hostname() -> Option<String> {
    env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .ok()
}
