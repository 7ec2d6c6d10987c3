//! Embedded machine configuration
//!
//! `build.rs` validates scara.toml and serializes it with postcard. The
//! blob is decoded and re-validated once at boot.

use defmt::*;

use scara_core::config::{ConfigError, MachineConfig};

/// Postcard blob written by the build script
static CONFIG_BLOB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/scara_config.bin"));

/// Decode the embedded configuration
pub fn load() -> Result<MachineConfig, ConfigError> {
    debug!("Decoding {} bytes of embedded config", CONFIG_BLOB.len());
    let config = MachineConfig::from_bytes(CONFIG_BLOB)?;
    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &MachineConfig) {
    info!("Configuration loaded successfully");
    let g = &config.geometry;
    debug!(
        "  arm A {}/{} mm, arm B {}/{} mm, base offset {} mm",
        g.proximal_a_mm, g.distal_a_mm, g.proximal_b_mm, g.distal_b_mm, g.base_offset_mm
    );
    debug!(
        "  frame offset ({}, {}) mm, mirror_y={}",
        config.frame.offset_x_mm, config.frame.offset_y_mm, config.frame.mirror_y
    );
    for axis in config.axes.iter() {
        debug!(
            "  axis {} -> joint {:?}: coils {}/{}/{}/{}, adc {}, sensor {}",
            axis.hw.name.as_str(),
            axis.joint,
            axis.hw.coil_pins[0].pin,
            axis.hw.coil_pins[1].pin,
            axis.hw.coil_pins[2].pin,
            axis.hw.coil_pins[3].pin,
            axis.hw.feedback_adc_pin,
            axis.hw.sensor_pin.pin
        );
    }
}
