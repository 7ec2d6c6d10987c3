//! Stepper phase sequencing
//!
//! Coil energization patterns for 4-phase steppers driven directly from
//! GPIO.

pub mod phase;

pub use phase::{CoilPattern, PhaseIndex, COIL_SEQUENCE, PHASE_COUNT, RELEASED};
