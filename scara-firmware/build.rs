//! Build script for scara-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scara.toml and embeds it as a postcard blob

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use scara_core::config::{ConfigError, MachineConfig};

/// Name of the embedded config blob in OUT_DIR
const CONFIG_BLOB: &str = "scara_config.bin";

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate scara.toml and write the binary config for `include_bytes!`
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=scara.toml");

    let config_path = Path::new("scara.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scara.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a scara.toml configuration file.          ║\n\
            ║  Please create one in the scara-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scara.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: MachineConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid scara.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    if let Err(e) = config.validate() {
        errors.push(describe(e));
    }
    for axis in config.axes.iter() {
        errors.extend(check_axis_pins(axis.hw.name.as_str(), axis));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid machine configuration in scara.toml              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    let blob = postcard::to_allocvec(&config).unwrap();
    fs::write(out_dir.join(CONFIG_BLOB), &blob).unwrap();

    println!(
        "cargo:warning=scara.toml validated successfully ({} axes, {} bytes)",
        config.axes.len(),
        blob.len()
    );
}

/// RP2040-specific pin checks the board-agnostic validation cannot make
fn check_axis_pins(name: &str, axis: &scara_core::config::AxisConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let hw = &axis.hw;

    for pin in hw.coil_pins.iter().chain([&hw.sensor_pin]) {
        if pin.pin > 29 {
            errors.push(format!("[{}] GPIO {} does not exist (0-29)", name, pin.pin));
        }
    }
    if !(26..=29).contains(&hw.feedback_adc_pin) {
        errors.push(format!(
            "[{}] feedback_adc_pin {} is not an ADC pin (26-29)",
            name, hw.feedback_adc_pin
        ));
    }

    errors
}

/// Human-readable text for a validation error
fn describe(e: ConfigError) -> String {
    match e {
        ConfigError::Geometry(g) => format!("[geometry] invalid link geometry: {:?}", g),
        ConfigError::NoAxes => "No [[axes]] configured - at least one is required".into(),
        ConfigError::InvalidStepTiming => {
            "Step intervals must be > 0 and fine >= full".into()
        }
        ConfigError::InvalidDeadBand => "dead_band_rad must be finite and >= 0".into(),
        ConfigError::InvalidFeedbackScale => "counts_per_radian must be > 0".into(),
        ConfigError::InvalidGoalRange => "goal_min_rad must be below goal_max_rad".into(),
        ConfigError::InvalidHomeAngle => "home_angle_rad must be finite".into(),
        ConfigError::InvalidHomingBudget => {
            "first_sweep_steps, max_zone_steps and timeout_ms must be > 0".into()
        }
        ConfigError::DuplicatePin => "A GPIO is assigned more than once".into(),
        ConfigError::DuplicateJoint => "Two axes drive the same joint".into(),
        ConfigError::Deserialize => "Config could not be decoded".into(),
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
