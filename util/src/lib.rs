//! Utility library for the guidance software
//!
//! Provides the services shared by every executable in the workspace:
//! parameter loading, logging, session directories and archiving, plus the
//! small geometry helpers used by the guidance laws.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
