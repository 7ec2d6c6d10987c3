//! 4-phase stepper with potentiometer feedback
//!
//! A unipolar/bipolar stepper driven directly from four GPIOs through a
//! transistor array, with a potentiometer on the joint for absolute
//! position. Each control cycle reads the feedback once and issues at most
//! one step toward the goal.
//!
//! # Direction convention
//!
//! Positive error (feedback above goal) advances the phase, which must
//! decrease the feedback reading. Wiring that does the opposite is handled
//! with `ActuatorConfig::feedback_inverted`.

use scara_core::config::ActuatorConfig;
use scara_core::kinematics::{Joint, JointAngles};
use scara_core::motion::{CoilPattern, PhaseIndex, RELEASED};
use scara_core::traits::{
    ActuatorError, Direction, FeedbackSensor, JointActuator, Resolution, SensorError, StepAxis,
    StepResult,
};
use scara_hal::{Monotonic, OutputPin};

/// Mutable per-axis state
///
/// Owned exclusively by one actuator; the only mutation path is the
/// actuator's own methods.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorState {
    /// Last feedback reading
    pub feedback_raw: Option<u16>,
    /// Commanded angle (rad)
    pub goal_rad: Option<f64>,
    /// Coil phase index
    pub phase: PhaseIndex,
    /// Direction of the last step
    pub direction: Direction,
    /// Signed steps from the zero reference
    pub position_steps: i32,
    /// Feedback reading at the zero reference
    pub zero_raw: Option<u16>,
    /// Step pacing
    pub resolution: Resolution,
    /// Any coil is driven
    pub energized: bool,
    /// Time of the last step (µs)
    pub last_step_us: Option<u64>,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            feedback_raw: None,
            goal_rad: None,
            phase: PhaseIndex::default(),
            direction: Direction::Forward,
            position_steps: 0,
            zero_raw: None,
            resolution: Resolution::Full,
            energized: false,
            last_step_us: None,
        }
    }
}

/// Closed-loop 4-phase stepper actuator
pub struct FourPhaseActuator<P, F, C> {
    coils: [P; 4],
    feedback: F,
    clock: C,
    config: ActuatorConfig,
    state: ActuatorState,
}

impl<P, F, C> FourPhaseActuator<P, F, C>
where
    P: OutputPin,
    F: FeedbackSensor,
    C: Monotonic,
{
    /// Create a new actuator with all coils released
    ///
    /// # Arguments
    /// - `coils`: Coil outputs in wire order A, B, C, D
    /// - `feedback`: Absolute joint position sensor
    /// - `clock`: Monotonic time source for step pacing
    pub fn new(coils: [P; 4], feedback: F, clock: C, config: ActuatorConfig) -> Self {
        let mut actuator = Self {
            coils,
            feedback,
            clock,
            config,
            state: ActuatorState::default(),
        };
        actuator.write_pattern(RELEASED);
        actuator
    }

    /// Command the angle from a kinematics solution
    pub fn set_joint_goal(&mut self, angles: &JointAngles, joint: Joint) -> Result<(), ActuatorError> {
        self.set_goal(angles.get(joint))
    }

    /// Stop tracking the goal (the motor holds its last pattern)
    pub fn clear_goal(&mut self) {
        self.state.goal_rad = None;
    }

    /// Last feedback reading
    pub fn feedback_raw(&self) -> Option<u16> {
        self.state.feedback_raw
    }

    /// Last feedback reading as a joint angle (rad)
    pub fn feedback_angle(&self) -> Option<f64> {
        match (self.state.feedback_raw, self.state.zero_raw) {
            (Some(raw), Some(zero)) => Some(self.raw_to_angle(raw, zero)),
            _ => None,
        }
    }

    /// Current coil phase
    pub fn phase(&self) -> PhaseIndex {
        self.state.phase
    }

    /// Check if any coil is driven
    pub fn is_energized(&self) -> bool {
        self.state.energized
    }

    /// Snapshot of the axis state
    pub fn state(&self) -> &ActuatorState {
        &self.state
    }

    pub fn config(&self) -> &ActuatorConfig {
        &self.config
    }

    /// Get access to the coil outputs
    pub fn coils(&self) -> &[P; 4] {
        &self.coils
    }

    /// Joint angle for a reading, relative to the reading taken at home
    fn raw_to_angle(&self, raw: u16, zero: u16) -> f64 {
        let travel = (f64::from(raw) - f64::from(zero)) / self.config.counts_per_radian;
        if self.config.feedback_inverted {
            self.config.home_angle_rad - travel
        } else {
            self.config.home_angle_rad + travel
        }
    }

    fn interval_elapsed(&self, now: u64) -> bool {
        match self.state.last_step_us {
            Some(last) => {
                let interval = self.config.step_interval_us(self.state.resolution);
                now.saturating_sub(last) >= u64::from(interval)
            }
            None => true,
        }
    }

    fn step_at(&mut self, dir: Direction, now: u64) {
        let phase = self.state.phase.step(dir);
        self.write_pattern(phase.pattern());
        self.state.phase = phase;
        self.state.direction = dir;
        self.state.position_steps = self.state.position_steps.wrapping_add(dir.sign());
        self.state.energized = true;
        self.state.last_step_us = Some(now);
    }

    fn write_pattern(&mut self, pattern: CoilPattern) {
        for (coil, level) in self.coils.iter_mut().zip(pattern.levels()) {
            coil.set_state(level);
        }
    }
}

impl<P, F, C> JointActuator for FourPhaseActuator<P, F, C>
where
    P: OutputPin,
    F: FeedbackSensor,
    C: Monotonic,
{
    fn set_goal(&mut self, angle_rad: f64) -> Result<(), ActuatorError> {
        if self.state.zero_raw.is_none() {
            return Err(ActuatorError::NotHomed);
        }
        if !self.config.accepts_goal(angle_rad) {
            return Err(ActuatorError::OutOfRange);
        }
        self.state.goal_rad = Some(angle_rad);
        Ok(())
    }

    fn goal(&self) -> Option<f64> {
        self.state.goal_rad
    }

    fn tick(&mut self) -> Result<StepResult, ActuatorError> {
        let zero = self.state.zero_raw.ok_or(ActuatorError::NotHomed)?;
        let Some(goal) = self.state.goal_rad else {
            return Ok(StepResult::NoGoal);
        };

        let now = self.clock.now_us();
        if !self.interval_elapsed(now) {
            return Ok(StepResult::Waiting);
        }

        let raw = match self.feedback.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                self.release();
                return Err(e.into());
            }
        };
        self.state.feedback_raw = Some(raw);

        let error = self.raw_to_angle(raw, zero) - goal;
        let band = self.config.dead_band_rad;
        if (-band..=band).contains(&error) {
            return Ok(StepResult::AtGoal);
        }

        let dir = if error > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.step_at(dir, now);
        Ok(StepResult::Stepped(dir))
    }

    fn release(&mut self) {
        self.write_pattern(RELEASED);
        self.state.energized = false;
    }
}

impl<P, F, C> StepAxis for FourPhaseActuator<P, F, C>
where
    P: OutputPin,
    F: FeedbackSensor,
    C: Monotonic,
{
    fn step(&mut self, dir: Direction) {
        let now = self.clock.now_us();
        self.step_at(dir, now);
    }

    fn position(&self) -> i32 {
        self.state.position_steps
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.state.resolution = resolution;
    }

    fn resolution(&self) -> Resolution {
        self.state.resolution
    }

    fn step_interval_us(&self) -> u32 {
        self.config.step_interval_us(self.state.resolution)
    }

    fn invalidate_reference(&mut self) {
        self.state.zero_raw = None;
        self.state.goal_rad = None;
    }

    fn set_zero(&mut self) -> Result<(), SensorError> {
        let raw = self.feedback.read_raw()?;
        self.state.feedback_raw = Some(raw);
        self.state.zero_raw = Some(raw);
        self.state.position_steps = 0;
        self.state.goal_rad = None;
        Ok(())
    }

    fn is_homed(&self) -> bool {
        self.state.zero_raw.is_some()
    }
}
