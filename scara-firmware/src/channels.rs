//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.
//! Each axis task owns its actuator; everything else talks to it here.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use scara_core::homing::HomingError;
use scara_core::kinematics::{Joint, Unreachable};
use scara_core::traits::ActuatorError;

/// Channel capacity for axis status reports
const STATUS_CHANNEL_SIZE: usize = 8;

/// Commands addressed to one axis task
pub struct AxisSignals {
    /// Joint angle goal in radians
    pub goal: Signal<CriticalSectionRawMutex, f64>,
    /// Re-run homing
    pub home: Signal<CriticalSectionRawMutex, ()>,
    /// Abort homing or motion and release the coils
    pub stop: Signal<CriticalSectionRawMutex, ()>,
}

impl AxisSignals {
    const fn new() -> Self {
        Self {
            goal: Signal::new(),
            home: Signal::new(),
            stop: Signal::new(),
        }
    }
}

static ARM_A: AxisSignals = AxisSignals::new();
static ARM_B: AxisSignals = AxisSignals::new();

/// Signals of the axis driving `joint`
pub fn axis_signals(joint: Joint) -> &'static AxisSignals {
    match joint {
        Joint::A => &ARM_A,
        Joint::B => &ARM_B,
    }
}

/// Cartesian tool target in bed coordinates (mm)
pub static MOTION_TARGET: Signal<CriticalSectionRawMutex, (f64, f64)> = Signal::new();

/// Axis and motion status reports
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisStatus {
    /// Homing finished; the zero reference is set
    Homed { joint: Joint, zero_offset_steps: i32 },
    /// Homing failed; the axis stays unusable until re-homed
    HomingFailed { joint: Joint, error: HomingError },
    /// Feedback is within the dead-band of the goal
    GoalReached { joint: Joint },
    /// Goal rejected or tracking stopped on a fault
    Fault { joint: Joint, error: ActuatorError },
    /// Axis stopped on request
    Stopped { joint: Joint },
    /// Motion target outside the workspace
    Unreachable { x_mm: f64, y_mm: f64, reason: Unreachable },
    /// Target solved, but an axis would refuse its angle; neither arm moved
    GoalRejected { x_mm: f64, y_mm: f64, joint: Joint },
}

/// Status reports from the axis and motion tasks
pub static AXIS_STATUS: Channel<CriticalSectionRawMutex, AxisStatus, STATUS_CHANNEL_SIZE> =
    Channel::new();
