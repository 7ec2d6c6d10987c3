//! Hardware configuration types
//!
//! These types define the per-axis pin assignment and tie it to the
//! actuator and homing parameters of that axis.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{
    ActuatorConfig, ConfigError, FrameConfig, GeometryConfig, HomingConfig, MAX_LABEL_LEN,
};
use crate::kinematics::{Joint, JointAngles, LinkGeometry};

/// Maximum axes per config (one per arm)
pub const MAX_AXES: usize = 2;

/// GPIOs used by one axis: four coils, feedback ADC and proximity sensor
const PINS_PER_AXIS: usize = 6;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
    /// Enable internal pull-up
    #[cfg_attr(feature = "serde", serde(default))]
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Pin assignment of one axis
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisHwConfig {
    /// Axis name (e.g., "arm_a")
    pub name: String<MAX_LABEL_LEN>,
    /// Coil outputs in wire order A, B, C, D
    pub coil_pins: [PinConfig; 4],
    /// Potentiometer ADC input (GPIO 26-29 on RP2040)
    pub feedback_adc_pin: u8,
    /// Hall-effect sensor input
    pub sensor_pin: PinConfig,
}

/// Complete configuration of one axis
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Pin assignment
    pub hw: AxisHwConfig,
    /// Joint this axis drives
    pub joint: Joint,
    /// Closed-loop tuning
    #[cfg_attr(feature = "serde", serde(default))]
    pub actuator: ActuatorConfig,
    /// Homing budgets
    #[cfg_attr(feature = "serde", serde(default))]
    pub homing: HomingConfig,
}

/// Complete machine configuration
///
/// This is the top-level configuration structure that contains the arm
/// geometry and every axis.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    /// Link lengths and forbidden zones
    pub geometry: GeometryConfig,
    /// Arm origin on the bed
    #[cfg_attr(feature = "serde", serde(default))]
    pub frame: FrameConfig,
    /// Axis configurations
    pub axes: Vec<AxisConfig, MAX_AXES>,
}

impl MachineConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an axis by name
    pub fn find_axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes.iter().find(|a| a.hw.name.as_str() == name)
    }

    /// Find the axis driving a joint
    pub fn axis_for_joint(&self, joint: Joint) -> Option<&AxisConfig> {
        self.axes.iter().find(|a| a.joint == joint)
    }

    /// Check a solved pose against every configured axis's goal range
    ///
    /// Returns the first joint whose axis would refuse its angle.
    pub fn check_goals(&self, angles: &JointAngles) -> Result<(), Joint> {
        for axis in self.axes.iter() {
            if !axis.actuator.accepts_goal(angles.get(axis.joint)) {
                return Err(axis.joint);
            }
        }
        Ok(())
    }

    /// Validated link geometry
    pub fn link_geometry(&self) -> Result<LinkGeometry, ConfigError> {
        Ok(LinkGeometry::try_from(&self.geometry)?)
    }

    /// Check the whole configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.link_geometry()?;

        if self.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }

        let mut pins: Vec<u8, { MAX_AXES * PINS_PER_AXIS }> = Vec::new();
        let mut joints: Vec<Joint, MAX_AXES> = Vec::new();

        for axis in self.axes.iter() {
            axis.actuator.validate()?;
            axis.homing.validate()?;

            if joints.contains(&axis.joint) {
                return Err(ConfigError::DuplicateJoint);
            }
            // Capacity matches MAX_AXES
            let _ = joints.push(axis.joint);

            let hw = &axis.hw;
            let axis_pins = hw
                .coil_pins
                .iter()
                .map(|p| p.pin)
                .chain([hw.feedback_adc_pin, hw.sensor_pin.pin]);
            for pin in axis_pins {
                if pins.contains(&pin) {
                    return Err(ConfigError::DuplicatePin);
                }
                let _ = pins.push(pin);
            }
        }

        Ok(())
    }

    /// Decode and validate a postcard blob
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: MachineConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
