//! Analog input abstraction
//!
//! A single analog channel, sampled on demand. The axis feedback
//! potentiometer is read through this trait once per control cycle.

/// ADC operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete
    ConversionFailed,
    /// Channel is not configured or already in use
    ChannelUnavailable,
}

/// One analog input channel
pub trait AnalogInput {
    /// Full-scale count of the converter (e.g. 4095 for 12-bit)
    fn max_count(&self) -> u16;

    /// Take one blocking sample
    fn read(&mut self) -> Result<u16, AdcError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn max_count(&self) -> u16 {
        T::max_count(self)
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        T::read(self)
    }
}
