//! Potentiometer position feedback
//!
//! The joint shaft turns a potentiometer wired as a voltage divider across
//! the ADC reference. Readings pinned at either rail mean an open wiper or
//! a short, so they are rejected instead of being treated as an angle.

use scara_core::traits::{FeedbackSensor, SensorError};
use scara_hal::AnalogInput;

/// Potentiometer sampling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotentiometerConfig {
    /// Samples averaged per reading
    pub samples: u8,
    /// Lowest plausible count
    pub min_valid: u16,
    /// Highest plausible count
    pub max_valid: u16,
}

impl Default for PotentiometerConfig {
    fn default() -> Self {
        Self {
            samples: 4,
            min_valid: 16,
            max_valid: 4095 - 16,
        }
    }
}

/// Potentiometer on an analog input
pub struct Potentiometer<A> {
    adc: A,
    config: PotentiometerConfig,
}

impl<A: AnalogInput> Potentiometer<A> {
    /// Create a new potentiometer reader
    pub fn new(adc: A, config: PotentiometerConfig) -> Self {
        Self { adc, config }
    }

    /// Create a reader with the rail margins scaled to the ADC range
    pub fn with_defaults(adc: A) -> Self {
        let margin = adc.max_count() / 256;
        let config = PotentiometerConfig {
            min_valid: margin,
            max_valid: adc.max_count() - margin,
            ..PotentiometerConfig::default()
        };
        Self::new(adc, config)
    }

    pub fn config(&self) -> &PotentiometerConfig {
        &self.config
    }
}

impl<A: AnalogInput> FeedbackSensor for Potentiometer<A> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let samples = self.config.samples.max(1);
        let mut sum: u32 = 0;
        for _ in 0..samples {
            let value = self.adc.read().map_err(|_| SensorError::ConversionError)?;
            sum += u32::from(value);
        }
        let value = (sum / u32::from(samples)) as u16;

        if value < self.config.min_valid || value > self.config.max_valid {
            return Err(SensorError::OutOfRange);
        }
        Ok(value)
    }
}
