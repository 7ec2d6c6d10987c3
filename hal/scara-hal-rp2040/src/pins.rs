//! Dynamic pin allocation for config-driven hardware setup
//!
//! Coil, sensor and feedback pins come from the machine config, so the
//! firmware takes them by number at runtime. GPIO 26-29 stay typed until
//! taken because only the concrete pin types can open an ADC channel.

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::{ADC, PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::{Peri, Peripherals};

use crate::adc::AdcChannel;

/// Number of user GPIOs on the RP2040
const GPIO_COUNT: u8 = 30;

/// First ADC-capable GPIO
const FIRST_ADC_GPIO: u8 = 26;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin has no ADC channel (only 26-29 do)
    NotAdcCapable,
}

/// Pin bank that holds all GPIO pins and allows taking them by number
///
/// This enables config-driven pin assignment where pin numbers come from
/// a TOML config file rather than being hardcoded.
pub struct PinBank {
    digital: [Option<Peri<'static, AnyPin>>; FIRST_ADC_GPIO as usize],
    pin26: Option<Peri<'static, PIN_26>>,
    pin27: Option<Peri<'static, PIN_27>>,
    pin28: Option<Peri<'static, PIN_28>>,
    pin29: Option<Peri<'static, PIN_29>>,
}

/// Non-GPIO peripherals that remain after creating PinBank
pub struct RemainingPeripherals {
    pub adc: Peri<'static, ADC>,
}

impl PinBank {
    /// Split the GPIOs out of the embassy peripherals
    ///
    /// After this call, pins must be obtained through `take()` or
    /// `take_adc()`.
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let bank = Self {
            digital: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
            ],
            pin26: Some(p.PIN_26),
            pin27: Some(p.PIN_27),
            pin28: Some(p.PIN_28),
            pin29: Some(p.PIN_29),
        };
        let remaining = RemainingPeripherals {
            adc: p.ADC,
        };
        (bank, remaining)
    }

    /// Take a pin by number for digital use
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        let pin = match pin_num {
            26 => self.pin26.take().map(|p| p.into()),
            27 => self.pin27.take().map(|p| p.into()),
            28 => self.pin28.take().map(|p| p.into()),
            29 => self.pin29.take().map(|p| p.into()),
            n => self.digital[n as usize].take(),
        };
        pin.ok_or(PinError::AlreadyTaken)
    }

    /// Take an ADC-capable pin as a floating analog channel
    pub fn take_adc(&mut self, pin_num: u8) -> Result<Channel<'static>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        let channel = AdcChannel::from_gpio(pin_num).ok_or(PinError::NotAdcCapable)?;
        let taken = match channel {
            AdcChannel::Adc0 => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc1 => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc2 => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc3 => self.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
        };
        taken.ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        match pin_num {
            26 => self.pin26.is_some(),
            27 => self.pin27.is_some(),
            28 => self.pin28.is_some(),
            29 => self.pin29.is_some(),
            n if n < FIRST_ADC_GPIO => self.digital[n as usize].is_some(),
            _ => false,
        }
    }
}
