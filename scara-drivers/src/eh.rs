//! embedded-hal 1.0 pin adapters
//!
//! Wraps any infallible `embedded-hal` digital pin so it can drive a coil
//! or read the homing sensor through the `scara-hal` traits.

use core::convert::Infallible;

use embedded_hal::digital;
use scara_hal::{InputPin, OutputPin};

/// Output pin adapter with optional inversion
///
/// The logical level is cached, so `is_set_high` does not need a
/// stateful pin.
pub struct EhOutput<P> {
    pin: P,
    inverted: bool,
    high: bool,
}

impl<P: digital::OutputPin<Error = Infallible>> EhOutput<P> {
    /// Wrap a pin and drive it to the logical low level
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut out = Self {
            pin,
            inverted,
            high: true,
        };
        out.set_low();
        out
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }

    fn write(&mut self, high: bool) {
        self.high = high;
        let result = if high != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            match e {}
        }
    }
}

impl<P: digital::OutputPin<Error = Infallible>> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        self.write(true);
    }

    fn set_low(&mut self) {
        self.write(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin adapter with optional inversion
pub struct EhInput<P> {
    pin: P,
    inverted: bool,
}

impl<P: digital::InputPin<Error = Infallible>> EhInput<P> {
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: digital::InputPin<Error = Infallible>> InputPin for EhInput<P> {
    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level != self.inverted,
            Err(e) => match e {},
        }
    }
}
