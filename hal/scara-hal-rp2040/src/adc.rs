//! ADC channel management
//!
//! RP2040 has a single ADC with 4 external channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//!
//! Every axis reads its potentiometer through the same converter, so the
//! driver lives in a critical-section mutex and each channel borrows it
//! for one blocking conversion.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use scara_hal::{AdcError, AnalogInput};

/// 12-bit converter
const ADC_MAX_COUNT: u16 = 4095;

/// ADC driver shared between axes
pub type SharedAdc = Mutex<CriticalSectionRawMutex, RefCell<Adc<'static, Blocking>>>;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
}

impl AdcChannel {
    /// Get the GPIO pin for this ADC channel
    pub fn gpio(&self) -> u8 {
        match self {
            AdcChannel::Adc0 => 26,
            AdcChannel::Adc1 => 27,
            AdcChannel::Adc2 => 28,
            AdcChannel::Adc3 => 29,
        }
    }

    /// Get ADC channel from GPIO pin
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }
}

/// One analog input on the shared converter
pub struct RpAdcChannel {
    adc: &'static SharedAdc,
    channel: Channel<'static>,
}

impl RpAdcChannel {
    pub fn new(adc: &'static SharedAdc, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for RpAdcChannel {
    fn max_count(&self) -> u16 {
        ADC_MAX_COUNT
    }

    fn read(&mut self) -> Result<u16, AdcError> {
        let channel = &mut self.channel;
        self.adc
            .lock(|adc| adc.borrow_mut().blocking_read(channel))
            .map_err(|_| AdcError::ConversionFailed)
    }
}
