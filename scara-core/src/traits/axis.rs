//! Stepping axis and joint actuator traits
//!
//! A joint is driven by a 4-phase stepper and read back by an absolute
//! feedback sensor. Homing only needs the raw stepping primitive
//! ([`StepAxis`]); normal operation goes through the closed-loop
//! [`JointActuator`] interface.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::sensor::SensorError;

/// Step direction
///
/// `Forward` advances the coil phase index (+1 mod 4) and increments the
/// step position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Phase +1, position +1
    #[default]
    Forward,
    /// Phase -1, position -1
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Signed step increment
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Step pacing
///
/// The 4-phase pattern has no electrical micro-stepping; `Fine` paces
/// steps at the slower approach interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    #[default]
    Full,
    Fine,
}

/// Outcome of one actuator control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepResult {
    /// One step was issued
    Stepped(Direction),
    /// Feedback is inside the dead-band
    AtGoal,
    /// Minimum step interval has not elapsed
    Waiting,
    /// No goal is set
    NoGoal,
}

/// Errors that can occur driving a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// No zero reference has been established
    NotHomed,
    /// Goal outside the configured joint range, or not finite
    OutOfRange,
    /// Feedback sensor read failed
    Feedback(SensorError),
}

impl From<SensorError> for ActuatorError {
    fn from(e: SensorError) -> Self {
        ActuatorError::Feedback(e)
    }
}

/// Raw stepping primitive used by homing
///
/// Implementations issue exactly one step per `step()` call and never
/// consult the goal or the feedback loop.
pub trait StepAxis {
    /// Issue one step and energize the matching coil pattern
    fn step(&mut self, dir: Direction);

    /// Signed step count from the zero reference
    fn position(&self) -> i32;

    /// Select step pacing
    fn set_resolution(&mut self, resolution: Resolution);

    /// Current step pacing
    fn resolution(&self) -> Resolution;

    /// Minimum time between steps at the current resolution
    fn step_interval_us(&self) -> u32;

    /// Forget the zero reference and any goal
    fn invalidate_reference(&mut self);

    /// Make the current location the logical zero
    ///
    /// Captures the feedback reading as the new reference, overwriting any
    /// previous calibration.
    fn set_zero(&mut self) -> Result<(), SensorError>;

    /// Check if a zero reference is established
    fn is_homed(&self) -> bool;
}

/// Closed-loop joint control
///
/// `tick()` is polled every control cycle and issues at most one step.
pub trait JointActuator {
    /// Command a new goal angle in radians
    fn set_goal(&mut self, angle_rad: f64) -> Result<(), ActuatorError>;

    /// Current goal, if any
    fn goal(&self) -> Option<f64>;

    /// Run one control cycle
    fn tick(&mut self) -> Result<StepResult, ActuatorError>;

    /// De-energize all coils
    fn release(&mut self);
}
