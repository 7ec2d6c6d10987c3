//! Configuration type definitions
//!
//! Geometry, frame, actuator and homing parameters. The firmware embeds
//! these as postcard-serialized binary data produced at build time.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kinematics::GeometryError;
use crate::traits::{Direction, Resolution};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Link geometry is invalid
    Geometry(GeometryError),
    /// No axis is configured
    NoAxes,
    /// A step interval is zero, or fine is faster than full
    InvalidStepTiming,
    /// Dead-band is negative or not finite
    InvalidDeadBand,
    /// Feedback counts per radian is not positive
    InvalidFeedbackScale,
    /// Goal range is empty or not finite
    InvalidGoalRange,
    /// Home angle is not finite
    InvalidHomeAngle,
    /// A homing budget is zero
    InvalidHomingBudget,
    /// The same GPIO is assigned twice
    DuplicatePin,
    /// Two axes drive the same joint
    DuplicateJoint,
    /// Binary config blob could not be decoded
    Deserialize,
}

impl From<GeometryError> for ConfigError {
    fn from(e: GeometryError) -> Self {
        ConfigError::Geometry(e)
    }
}

/// Link lengths and forbidden zones
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryConfig {
    /// Arm A motor-side link (mm)
    pub proximal_a_mm: f64,
    /// Arm A tip-side link (mm)
    pub distal_a_mm: f64,
    /// Arm B motor-side link (mm)
    pub proximal_b_mm: f64,
    /// Arm B tip-side link (mm)
    pub distal_b_mm: f64,
    /// Distance from arm A's origin to arm B's origin along X (mm)
    pub base_offset_mm: f64,
    /// Minimum Y above the shared baseline (mm)
    pub min_clearance_mm: f64,
    /// Unreachable radius around arm A's origin (mm)
    pub dead_zone_radius_mm: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            proximal_a_mm: 80.0,
            distal_a_mm: 100.0,
            proximal_b_mm: 80.0,
            distal_b_mm: 100.0,
            base_offset_mm: 50.0,
            min_clearance_mm: 5.0,
            dead_zone_radius_mm: 0.0,
        }
    }
}

/// Position of the arm origin on the bed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameConfig {
    /// Bed X of the arm origin (mm)
    pub offset_x_mm: f64,
    /// Bed Y of the arm origin (mm)
    pub offset_y_mm: f64,
    /// Arm Y axis points opposite to bed Y
    #[cfg_attr(feature = "serde", serde(default))]
    pub mirror_y: bool,
}

/// Closed-loop actuator tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorConfig {
    /// No step is issued while |error| is within this band (rad)
    pub dead_band_rad: f64,
    /// Feedback ADC counts per radian of joint rotation
    pub counts_per_radian: f64,
    /// Feedback count decreases as the joint angle increases
    pub feedback_inverted: bool,
    /// Minimum time between steps at full resolution (µs)
    pub full_step_interval_us: u32,
    /// Minimum time between steps at fine resolution (µs)
    pub fine_step_interval_us: u32,
    /// Lowest accepted goal (rad)
    pub goal_min_rad: f64,
    /// Highest accepted goal (rad)
    pub goal_max_rad: f64,
    /// Joint angle at the homing reference point (rad)
    #[cfg_attr(feature = "serde", serde(default))]
    pub home_angle_rad: f64,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            dead_band_rad: 0.01,
            // 12-bit ADC across a 300° potentiometer
            counts_per_radian: 782.0,
            feedback_inverted: false,
            full_step_interval_us: 2_000,
            fine_step_interval_us: 8_000,
            goal_min_rad: -core::f64::consts::PI,
            goal_max_rad: core::f64::consts::PI,
            home_angle_rad: 0.0,
        }
    }
}

impl ActuatorConfig {
    /// Step interval for a resolution
    pub fn step_interval_us(&self, resolution: Resolution) -> u32 {
        match resolution {
            Resolution::Full => self.full_step_interval_us,
            Resolution::Fine => self.fine_step_interval_us,
        }
    }

    /// Goal lies inside the configured range
    pub fn accepts_goal(&self, angle_rad: f64) -> bool {
        angle_rad.is_finite() && angle_rad >= self.goal_min_rad && angle_rad <= self.goal_max_rad
    }

    /// Check the tuning for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.full_step_interval_us == 0 || self.fine_step_interval_us < self.full_step_interval_us
        {
            return Err(ConfigError::InvalidStepTiming);
        }
        if !self.dead_band_rad.is_finite() || self.dead_band_rad < 0.0 {
            return Err(ConfigError::InvalidDeadBand);
        }
        if !self.counts_per_radian.is_finite() || self.counts_per_radian <= 0.0 {
            return Err(ConfigError::InvalidFeedbackScale);
        }
        if !self.goal_min_rad.is_finite()
            || !self.goal_max_rad.is_finite()
            || self.goal_min_rad >= self.goal_max_rad
        {
            return Err(ConfigError::InvalidGoalRange);
        }
        if !self.home_angle_rad.is_finite() {
            return Err(ConfigError::InvalidHomeAngle);
        }
        Ok(())
    }
}

/// Homing search budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingConfig {
    /// Direction of the first sweep
    pub initial_direction: Direction,
    /// Step budget of the first sweep
    pub first_sweep_steps: u32,
    /// Step budget of the reversed sweep
    pub reverse_sweep_steps: u32,
    /// Widest sensor zone accepted, in steps
    pub max_zone_steps: u32,
    /// Wall-clock budget of the whole run (ms)
    pub timeout_ms: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            initial_direction: Direction::Forward,
            first_sweep_steps: 400,
            reverse_sweep_steps: 800,
            max_zone_steps: 200,
            timeout_ms: 30_000,
        }
    }
}

impl HomingConfig {
    /// Check that every phase has a non-zero budget
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_sweep_steps == 0 || self.max_zone_steps == 0 || self.timeout_ms == 0 {
            return Err(ConfigError::InvalidHomingBudget);
        }
        Ok(())
    }
}
