//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in scara-core for the arm's joint hardware:
//!
//! - Actuators (4-phase stepper with potentiometer feedback)
//! - Sensors (Hall-effect homing switch, potentiometer)
//! - Adapters for `embedded-hal` 1.0 digital pins

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod eh;
pub mod sensor;
pub mod stepper;

pub use eh::{EhInput, EhOutput};
pub use sensor::{HallSensor, Potentiometer, PotentiometerConfig};
pub use stepper::{ActuatorState, FourPhaseActuator};
