//! # Guidance library.
//!
//! This library allows other crates in the workspace (and the benches) to
//! access items defined inside the guidance crate.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Path definitions shared by the guidance modules
pub mod path;

/// Path following - converts a line or orbit into course and altitude
/// commands
pub mod path_follow;

/// Dubins planner - shortest curvature bounded path between two
/// configurations
pub mod dubins;

/// Dubins executor - flies a waypoint chain leg by leg
pub mod dubins_exec;

/// Guidance - runs the executor and follower together each tick
pub mod guidance;

/// Mission - waypoint chain loading and up front leg planning
pub mod mission;
