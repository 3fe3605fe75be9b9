//! # Dubins path module
//!
//! A Dubins path is the shortest path between two oriented configurations for
//! a vehicle which can only fly forwards and cannot turn tighter than a given
//! radius. Between configurations that are far enough apart (at least three
//! turn radii) the shortest path is always an arc on a turn circle at the
//! start, a straight tangent line, and an arc on a turn circle at the end.
//!
//! Each configuration has a right (clockwise) and a left (counter-clockwise)
//! turn circle, giving four candidate paths, RSR, RSL, LSR and LSL. The
//! planner computes the length of each and keeps the shortest. For the
//! crossed cases (RSL and LSR) the tangent line passes between the circles
//! and only exists if the circle centres are at least two radii apart.
//!
//! The planned path is described by three half planes which bound its
//! segments: H1 where the start arc meets the line, H2 where the line meets
//! the end arc, and H3 at the end configuration. These are used by
//! [`crate::dubins_exec`] to switch between segments.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod path;
mod planner;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use path::*;
pub use planner::*;
