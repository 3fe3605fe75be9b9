//! # Path following module
//!
//! Path following converts a path (a straight line or a circular orbit) and
//! the current vehicle configuration into a commanded course and altitude for
//! the inner control loop.
//!
//! For a line the crosstrack error is the signed horizontal distance from the
//! line, positive to the right of the direction of travel. The commanded
//! course approaches the line course through an arctangent law, so the
//! correction saturates at `chi_inf_rad` when far from the line and steepens
//! with `k_path` as the vehicle closes on it. The commanded altitude is the
//! altitude of the line abeam the vehicle.
//!
//! For an orbit the crosstrack error is the distance from the orbit circle.
//! The commanded course is tangent to the circle once on it, and points
//! towards the circle when off it, with `k_orbit` setting how sharply.
//!
//! Both laws are pure functions of their inputs, [`PathFollower`] only holds
//! the tuning gains.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::PathFollowParams;
