//! Hall-effect proximity sensor
//!
//! A digital Hall switch used as the homing reference. Most modules pull
//! the output low when a magnet is present.

use scara_core::traits::ProximitySensor;
use scara_hal::InputPin;

/// Hall-effect switch on a digital input
pub struct HallSensor<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> HallSensor<P> {
    /// Create a new Hall sensor
    ///
    /// # Arguments
    /// - `pin`: Digital input the sensor output is wired to
    /// - `active_low`: Sensor pulls the line low when the magnet is detected
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Create a sensor that reads low when triggered (open-drain modules)
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Get access to the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: InputPin> ProximitySensor for HallSensor<P> {
    fn is_active(&mut self) -> bool {
        self.pin.is_high() != self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInput {
        high: bool,
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low() {
        let mut sensor = HallSensor::new_active_low(MockInput { high: false });
        assert!(sensor.is_active());

        let mut sensor = HallSensor::new_active_low(MockInput { high: true });
        assert!(!sensor.is_active());
    }

    #[test]
    fn test_active_high() {
        let mut sensor = HallSensor::new(MockInput { high: true }, false);
        assert!(sensor.is_active());
        assert!(sensor.pin().high);
    }
}
