//! Axis homing
//!
//! Establishes the absolute zero of a joint by finding the centre of a
//! Hall-effect sensor's active zone.

pub mod controller;

pub use controller::{HomingController, HomingError, HomingOutcome, HomingPhase, HomingStatus};
