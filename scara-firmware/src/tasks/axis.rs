//! Per-axis control task
//!
//! Homes the axis on boot, then tracks joint goals from the motion task.
//! One instance runs per configured axis; the actuator is owned by its task.

use defmt::*;
use embassy_futures::select::{select, select3, Either, Either3};
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use scara_core::config::HomingConfig;
use scara_core::homing::{HomingController, HomingError, HomingOutcome, HomingStatus};
use scara_core::kinematics::Joint;
use scara_core::traits::{JointActuator, StepResult};
use scara_drivers::{EhInput, EhOutput, FourPhaseActuator, HallSensor, Potentiometer};
use scara_hal_rp2040::{EmbassyClock, RpAdcChannel};

use crate::channels::{axis_signals, AxisSignals, AxisStatus, AXIS_STATUS};

/// Control loop period (500µs, below the fastest step interval)
const CONTROL_PERIOD_US: u64 = 500;

/// Coils are released after the goal has been held this long
const IDLE_RELEASE_MS: u64 = 500;

pub type CoilPin = EhOutput<Output<'static>>;
pub type HallInput = HallSensor<EhInput<Input<'static>>>;
pub type AxisActuator = FourPhaseActuator<CoilPin, Potentiometer<RpAdcChannel>, EmbassyClock>;

/// I/O owned by one axis task
pub struct AxisHardware {
    pub actuator: AxisActuator,
    pub sensor: HallInput,
}

/// Static parameters of one axis task
#[derive(Debug, Clone, Copy)]
pub struct AxisSetup {
    pub joint: Joint,
    pub homing: HomingConfig,
}

/// Axis control task
///
/// Re-homes whenever the home signal fires. A failed homing run leaves the
/// coils released until a new home request arrives.
#[embassy_executor::task(pool_size = 2)]
pub async fn axis_task(mut hw: AxisHardware, setup: AxisSetup) {
    let joint = setup.joint;
    let signals = axis_signals(joint);
    info!("Axis {:?} task started", joint);

    let mut ticker = Ticker::every(Duration::from_micros(CONTROL_PERIOD_US));

    loop {
        // Commands issued before this homing run do not apply to it
        signals.goal.reset();
        signals.home.reset();
        signals.stop.reset();

        match home(&mut hw, &setup, signals, &mut ticker).await {
            Ok(outcome) => {
                info!(
                    "Axis {:?} homed: zero at step {}, zone {}..{}, {} steps",
                    joint,
                    outcome.zero_offset_steps,
                    outcome.edge_entry,
                    outcome.edge_exit,
                    outcome.steps_taken
                );
                AXIS_STATUS
                    .send(AxisStatus::Homed {
                        joint,
                        zero_offset_steps: outcome.zero_offset_steps,
                    })
                    .await;
                track(&mut hw.actuator, joint, signals, &mut ticker).await;
            }
            Err(error) => {
                error!("Axis {:?} homing failed: {:?}", joint, error);
                hw.actuator.release();
                AXIS_STATUS
                    .send(AxisStatus::HomingFailed { joint, error })
                    .await;
                signals.home.wait().await;
            }
        }
    }
}

/// Run one homing search to completion
async fn home(
    hw: &mut AxisHardware,
    setup: &AxisSetup,
    signals: &AxisSignals,
    ticker: &mut Ticker,
) -> Result<HomingOutcome, HomingError> {
    let clock = EmbassyClock;
    let mut homing = HomingController::new(&mut hw.actuator, &mut hw.sensor, &clock, setup.homing);
    let mut last_phase = None;
    info!("Axis {:?} homing started", setup.joint);

    loop {
        if let Either::First(()) = select(signals.stop.wait(), ticker.next()).await {
            warn!("Axis {:?} homing aborted", setup.joint);
            homing.abort();
        }

        match homing.poll() {
            HomingStatus::Done(outcome) => return Ok(outcome),
            HomingStatus::Failed(e) => return Err(e),
            HomingStatus::InProgress(phase) => {
                if last_phase != Some(phase) {
                    debug!("Axis {:?} homing phase {:?}", setup.joint, phase);
                    last_phase = Some(phase);
                }
            }
        }
    }
}

/// Track goals until a re-home is requested
async fn track(
    actuator: &mut AxisActuator,
    joint: Joint,
    signals: &AxisSignals,
    ticker: &mut Ticker,
) {
    let mut at_goal_since: Option<Instant> = None;

    loop {
        match select3(signals.home.wait(), signals.stop.wait(), ticker.next()).await {
            Either3::First(()) => {
                info!("Axis {:?} re-homing", joint);
                return;
            }
            Either3::Second(()) => {
                actuator.clear_goal();
                actuator.release();
                at_goal_since = None;
                warn!("Axis {:?} stopped", joint);
                AXIS_STATUS.send(AxisStatus::Stopped { joint }).await;
                continue;
            }
            Either3::Third(()) => {}
        }

        if let Some(goal) = signals.goal.try_take() {
            match actuator.set_goal(goal) {
                Ok(()) => {
                    debug!("Axis {:?} goal {} rad", joint, goal);
                    at_goal_since = None;
                }
                Err(error) => {
                    warn!("Axis {:?} goal {} rad rejected: {:?}", joint, goal, error);
                    AXIS_STATUS.send(AxisStatus::Fault { joint, error }).await;
                }
            }
        }

        match actuator.tick() {
            Ok(StepResult::AtGoal) => match at_goal_since {
                None => {
                    at_goal_since = Some(Instant::now());
                    debug!("Axis {:?} at goal, feedback {:?}", joint, actuator.feedback_raw());
                    AXIS_STATUS.send(AxisStatus::GoalReached { joint }).await;
                }
                Some(since) => {
                    if actuator.is_energized()
                        && since.elapsed() >= Duration::from_millis(IDLE_RELEASE_MS)
                    {
                        trace!("Axis {:?} idle, releasing coils", joint);
                        actuator.release();
                    }
                }
            },
            Ok(StepResult::Stepped(dir)) => {
                at_goal_since = None;
                trace!("Axis {:?} step {:?} -> phase {}", joint, dir, actuator.phase().value());
            }
            Ok(StepResult::Waiting) | Ok(StepResult::NoGoal) => {}
            Err(error) => {
                error!("Axis {:?} tracking fault: {:?}", joint, error);
                actuator.clear_goal();
                at_goal_since = None;
                AXIS_STATUS.send(AxisStatus::Fault { joint, error }).await;
            }
        }
    }
}
