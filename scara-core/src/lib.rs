//! Board-agnostic core logic for the SCARA arm axis controller
//!
//! This crate contains all axis logic that does not depend on
//! specific hardware implementations:
//!
//! - Inverse and forward kinematics for the dual-arm (five-bar) SCARA
//! - Homing state machine for Hall-effect zero referencing
//! - Four-phase coil sequencing
//! - Hardware abstraction traits (step axis, joint actuator, sensors)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod homing;
pub mod kinematics;
pub mod motion;
pub mod traits;
