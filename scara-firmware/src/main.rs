//! SCARA - Dual-Arm Axis Controller Firmware
//!
//! Main firmware binary for RP2040-based five-bar SCARA arms. Each arm is
//! a 4-phase stepper with potentiometer feedback and a Hall-effect homing
//! sensor; pin assignment comes from scara.toml.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_sync::blocking_mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scara_core::config::{AxisConfig, MachineConfig, PinConfig};
use scara_core::kinematics::Frame;
use scara_drivers::{EhInput, EhOutput, FourPhaseActuator, HallSensor, Potentiometer};
use scara_hal_rp2040::{EmbassyClock, PinBank, PinError, RpAdcChannel, SharedAdc};

use crate::tasks::{AxisHardware, AxisSetup, CoilPin};

mod channels;
mod config;
mod tasks;

// The ADC is shared by both potentiometers and must live forever
static ADC: StaticCell<SharedAdc> = StaticCell::new();
static MACHINE_CONFIG: StaticCell<MachineConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SCARA firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let (mut pins, remaining) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded configuration rejected: {:?}", e);
            return;
        }
    };
    let config: &'static MachineConfig = MACHINE_CONFIG.init(config);
    let geometry = match config.link_geometry() {
        Ok(geometry) => geometry,
        Err(e) => {
            error!("Link geometry rejected: {:?}", e);
            return;
        }
    };

    let adc = Adc::new_blocking(remaining.adc, AdcConfig::default());
    let adc: &'static SharedAdc = ADC.init(Mutex::new(RefCell::new(adc)));
    info!("ADC initialized");

    for axis in config.axes.iter() {
        match build_axis(&mut pins, adc, axis) {
            Ok(hw) => {
                let setup = AxisSetup {
                    joint: axis.joint,
                    homing: axis.homing,
                };
                info!("Axis {} ready on joint {:?}", axis.hw.name.as_str(), axis.joint);
                spawner.spawn(tasks::axis_task(hw, setup)).unwrap();
            }
            Err(e) => {
                error!("Axis {} pin setup failed: {:?}", axis.hw.name.as_str(), e);
            }
        }
    }

    spawner
        .spawn(tasks::motion_task(config, geometry, Frame::from(&config.frame)))
        .unwrap();
    spawner.spawn(tasks::status_task()).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Claim the pins of one axis and build its actuator and sensor
fn build_axis(
    pins: &mut PinBank,
    adc: &'static SharedAdc,
    axis: &AxisConfig,
) -> Result<AxisHardware, PinError> {
    let hw = &axis.hw;

    let coils = [
        coil_pin(pins, &hw.coil_pins[0])?,
        coil_pin(pins, &hw.coil_pins[1])?,
        coil_pin(pins, &hw.coil_pins[2])?,
        coil_pin(pins, &hw.coil_pins[3])?,
    ];

    let channel = pins.take_adc(hw.feedback_adc_pin)?;
    let feedback = Potentiometer::with_defaults(RpAdcChannel::new(adc, channel));

    let pull = if hw.sensor_pin.pull_up {
        Pull::Up
    } else {
        Pull::None
    };
    let input = Input::new(pins.take(hw.sensor_pin.pin)?, pull);
    let sensor = HallSensor::new(EhInput::new(input, false), hw.sensor_pin.inverted);

    Ok(AxisHardware {
        actuator: FourPhaseActuator::new(coils, feedback, EmbassyClock, axis.actuator),
        sensor,
    })
}

/// Coil output, starting de-energized
fn coil_pin(pins: &mut PinBank, pin: &PinConfig) -> Result<CoilPin, PinError> {
    let output = Output::new(pins.take(pin.pin)?, Level::from(pin.inverted));
    Ok(EhOutput::new(output, pin.inverted))
}
