//! # Dubins executor module
//!
//! The executor walks a chain of oriented waypoints one leg at a time. Each
//! leg is a Dubins path from waypoint `i - 1` to waypoint `i`, flown in five
//! modes:
//!
//!  1. Orbit the start circle until behind the H1 plane
//!  1. Orbit the start circle until through the H1 plane
//!  1. Follow the straight tangent until through the H2 plane
//!  1. Orbit the end circle until behind the H3 plane
//!  1. Orbit the end circle until through the H3 plane, then start the next
//!     leg
//!
//! The two-step approach to each plane stops a vehicle which starts a leg
//! already past a plane (because the arc sweeps more than half a turn) from
//! switching early.
//!
//! The leg's path is replanned on every call from the waypoint lists, only
//! the leg index and mode ([`GuidanceState`]) persist between calls.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::DubinsExecParams;
pub use state::*;
