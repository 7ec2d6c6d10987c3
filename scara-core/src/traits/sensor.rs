//! Position sensing traits

/// Errors that can occur reading a position sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Reading outside the plausible range (open or shorted wiper)
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

/// Absolute analog position feedback (potentiometer or equivalent)
///
/// Takes `&mut self` because ADC reads typically require mutable access.
pub trait FeedbackSensor {
    /// Read the raw feedback count
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Binary proximity sensor used for homing (Hall-effect or similar)
pub trait ProximitySensor {
    /// Check if the sensor currently detects its target
    fn is_active(&mut self) -> bool;
}

impl<T: FeedbackSensor + ?Sized> FeedbackSensor for &mut T {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        T::read_raw(self)
    }
}

impl<T: ProximitySensor + ?Sized> ProximitySensor for &mut T {
    fn is_active(&mut self) -> bool {
        T::is_active(self)
    }
}
