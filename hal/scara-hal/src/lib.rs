//! SCARA Hardware Abstraction Layer
//!
//! This crate defines the board I/O traits consumed by the axis control
//! core. Chip-specific HALs implement them, so the same kinematics, homing
//! and actuator code runs on any board (or against mocks on the host).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  scara-firmware                         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  scara-core / scara-drivers             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  scara-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  scara-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O (coils, Hall sensor)
//! - [`adc::AnalogInput`] - Analog feedback (potentiometer wiper)
//! - [`time::Monotonic`] - Monotonic time source for step pacing

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod time;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInput};
pub use gpio::{InputPin, OutputPin};
pub use time::Monotonic;
