//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! (homing, goal tracking) and the concrete actuator and sensor drivers.

pub mod axis;
pub mod sensor;

pub use axis::{
    ActuatorError, Direction, JointActuator, Resolution, StepAxis, StepResult,
};
pub use sensor::{FeedbackSensor, ProximitySensor, SensorError};
