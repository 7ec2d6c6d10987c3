//! Position sensors

pub mod hall;
pub mod potentiometer;

pub use hall::HallSensor;
pub use potentiometer::{Potentiometer, PotentiometerConfig};
