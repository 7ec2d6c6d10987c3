//! RP2040-specific HAL for the SCARA firmware
//!
//! This crate provides RP2040 implementations of the shared `scara-hal`
//! traits, plus RP2040-specific functionality:
//!
//! - Dynamic pin allocation for config-driven setup
//! - Shared ADC channel access for potentiometer feedback
//! - Monotonic clock backed by the embassy time driver
//!
//! Digital coil outputs and the Hall input are embassy-rp `Output`/`Input`
//! pins wrapped in the `embedded-hal` adapters from `scara-drivers`.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod pins;
pub mod time;

pub use adc::{AdcChannel, RpAdcChannel, SharedAdc};
pub use pins::{PinBank, PinError, RemainingPeripherals};
pub use time::EmbassyClock;

// Re-export shared traits from scara-hal for convenience
pub use scara_hal::{AnalogInput, Monotonic};
