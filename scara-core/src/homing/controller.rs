//! Hall-sensor homing state machine
//!
//! The controller borrows the axis for the whole run, so the closed-loop
//! goal tracking cannot run on that axis until homing is finished and the
//! controller is dropped.
//!
//! Every `poll()` performs at most one transition and at most one step.
//! Steps are paced by the axis step interval against a monotonic clock;
//! nothing here blocks.

use scara_hal::Monotonic;

use crate::config::HomingConfig;
use crate::traits::{Direction, ProximitySensor, Resolution, SensorError, StepAxis};

/// Externally visible homing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Searching for the sensor zone
    Hunting,
    /// Crossing the sensor zone
    Tracking,
    /// Moving to the zone centre
    Aiming,
}

/// Reasons a homing run fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// Both sweeps used their budget without a trigger
    SensorNotFound,
    /// Started inside a zone that could not be backed out of
    ZoneTooWide,
    /// A Tracking or Aiming step budget was exhausted
    MoveTimeout,
    /// Wall-clock budget exhausted
    Timeout,
    /// Cancelled by the caller
    Aborted,
    /// Feedback read failed while committing the zero
    Feedback(SensorError),
}

impl From<SensorError> for HomingError {
    fn from(e: SensorError) -> Self {
        HomingError::Feedback(e)
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingOutcome {
    /// Zone centre in the step frame in effect before the zero was applied
    pub zero_offset_steps: i32,
    /// Position where the sensor first read active
    pub edge_entry: i32,
    /// Last position where the sensor read active
    pub edge_exit: i32,
    /// Total steps issued
    pub steps_taken: u32,
}

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingStatus {
    InProgress(HomingPhase),
    Done(HomingOutcome),
    Failed(HomingError),
}

impl HomingStatus {
    /// Check if the run has finished, successfully or not
    pub fn is_finished(&self) -> bool {
        !matches!(self, HomingStatus::InProgress(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    First,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Started inside the zone; leave it against the initial direction
    BackingOut { steps: u32 },
    Hunting { sweep: Sweep, dir: Direction, steps: u32 },
    Tracking { dir: Direction, entry: i32, last_active: i32, steps: u32 },
    Aiming { entry: i32, exit: i32, target: i32, budget: u32, steps: u32 },
    Done(HomingOutcome),
    Failed(HomingError),
}

/// Homing run for one axis
pub struct HomingController<'a, A, S, C>
where
    A: StepAxis,
    S: ProximitySensor,
    C: Monotonic,
{
    axis: &'a mut A,
    sensor: &'a mut S,
    clock: &'a C,
    config: HomingConfig,
    state: State,
    started_us: u64,
    last_step_us: Option<u64>,
    steps_taken: u32,
}

impl<'a, A, S, C> HomingController<'a, A, S, C>
where
    A: StepAxis,
    S: ProximitySensor,
    C: Monotonic,
{
    /// Start a homing run
    ///
    /// The axis reference is invalidated immediately, so an aborted or
    /// failed run leaves the axis unhomed.
    pub fn new(axis: &'a mut A, sensor: &'a mut S, clock: &'a C, config: HomingConfig) -> Self {
        axis.invalidate_reference();
        axis.set_resolution(Resolution::Full);

        let state = if sensor.is_active() {
            State::BackingOut { steps: 0 }
        } else {
            State::Hunting {
                sweep: Sweep::First,
                dir: config.initial_direction,
                steps: 0,
            }
        };

        Self {
            axis,
            sensor,
            clock,
            config,
            state,
            started_us: clock.now_us(),
            last_step_us: None,
            steps_taken: 0,
        }
    }

    /// Advance the search by at most one step
    pub fn poll(&mut self) -> HomingStatus {
        if self.is_finished() {
            return self.status();
        }

        let now = self.clock.now_us();
        let timeout_us = u64::from(self.config.timeout_ms) * 1_000;
        if now.saturating_sub(self.started_us) >= timeout_us {
            self.finish(State::Failed(HomingError::Timeout));
            return self.status();
        }

        if let Some(last) = self.last_step_us {
            if now.saturating_sub(last) < u64::from(self.axis.step_interval_us()) {
                return self.status();
            }
        }

        let next = self.transition(now);
        if matches!(next, State::Done(_) | State::Failed(_)) {
            self.finish(next);
        } else {
            self.state = next;
        }
        self.status()
    }

    /// Cancel the run
    ///
    /// No zero reference is committed. Has no effect once finished.
    pub fn abort(&mut self) {
        if !self.is_finished() {
            self.finish(State::Failed(HomingError::Aborted));
        }
    }

    /// Current status without advancing
    pub fn status(&self) -> HomingStatus {
        match self.state {
            State::BackingOut { .. } | State::Hunting { .. } => {
                HomingStatus::InProgress(HomingPhase::Hunting)
            }
            State::Tracking { .. } => HomingStatus::InProgress(HomingPhase::Tracking),
            State::Aiming { .. } => HomingStatus::InProgress(HomingPhase::Aiming),
            State::Done(outcome) => HomingStatus::Done(outcome),
            State::Failed(e) => HomingStatus::Failed(e),
        }
    }

    /// Current phase, `None` once finished
    pub fn phase(&self) -> Option<HomingPhase> {
        match self.status() {
            HomingStatus::InProgress(phase) => Some(phase),
            _ => None,
        }
    }

    /// Total steps issued so far
    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Recorded sensor edges `(entry, exit)`
    pub fn edges(&self) -> (Option<i32>, Option<i32>) {
        match self.state {
            State::Tracking { entry, .. } => (Some(entry), None),
            State::Aiming { entry, exit, .. } => (Some(entry), Some(exit)),
            State::Done(outcome) => (Some(outcome.edge_entry), Some(outcome.edge_exit)),
            _ => (None, None),
        }
    }

    /// Check if the run has finished
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done(_) | State::Failed(_))
    }

    fn transition(&mut self, now: u64) -> State {
        let position = self.axis.position();

        match self.state {
            State::BackingOut { steps } => {
                if !self.sensor.is_active() {
                    return State::Hunting {
                        sweep: Sweep::First,
                        dir: self.config.initial_direction,
                        steps: 0,
                    };
                }
                if steps >= self.config.max_zone_steps {
                    return State::Failed(HomingError::ZoneTooWide);
                }
                self.step(self.config.initial_direction.opposite(), now);
                State::BackingOut { steps: steps + 1 }
            }

            State::Hunting { sweep, dir, steps } => {
                if self.sensor.is_active() {
                    return State::Tracking {
                        dir,
                        entry: position,
                        last_active: position,
                        steps: 0,
                    };
                }

                let budget = match sweep {
                    Sweep::First => self.config.first_sweep_steps,
                    Sweep::Reverse => self.config.reverse_sweep_steps,
                };
                if steps >= budget {
                    return match sweep {
                        Sweep::First if self.config.reverse_sweep_steps > 0 => State::Hunting {
                            sweep: Sweep::Reverse,
                            dir: dir.opposite(),
                            steps: 0,
                        },
                        _ => State::Failed(HomingError::SensorNotFound),
                    };
                }

                self.step(dir, now);
                State::Hunting {
                    sweep,
                    dir,
                    steps: steps + 1,
                }
            }

            State::Tracking {
                dir,
                entry,
                last_active,
                steps,
            } => {
                if !self.sensor.is_active() {
                    return self.begin_aiming(entry, last_active);
                }

                if steps >= self.config.max_zone_steps {
                    return State::Failed(HomingError::MoveTimeout);
                }
                self.step(dir, now);
                State::Tracking {
                    dir,
                    entry,
                    last_active: position,
                    steps: steps + 1,
                }
            }

            State::Aiming {
                entry,
                exit,
                target,
                budget,
                steps,
            } => {
                if position == target {
                    return match self.axis.set_zero() {
                        Ok(()) => State::Done(HomingOutcome {
                            zero_offset_steps: target,
                            edge_entry: entry,
                            edge_exit: exit,
                            steps_taken: self.steps_taken,
                        }),
                        Err(e) => State::Failed(e.into()),
                    };
                }

                if steps >= budget {
                    return State::Failed(HomingError::MoveTimeout);
                }
                let dir = if target > position {
                    Direction::Forward
                } else {
                    Direction::Reverse
                };
                self.step(dir, now);
                State::Aiming {
                    entry,
                    exit,
                    target,
                    budget,
                    steps: steps + 1,
                }
            }

            State::Done(_) | State::Failed(_) => self.state,
        }
    }

    fn begin_aiming(&mut self, entry: i32, exit: i32) -> State {
        let target = ((i64::from(entry) + i64::from(exit)) / 2) as i32;
        let budget = entry.abs_diff(exit).saturating_add(1);
        self.axis.set_resolution(Resolution::Fine);
        State::Aiming {
            entry,
            exit,
            target,
            budget,
            steps: 0,
        }
    }

    fn step(&mut self, dir: Direction, now: u64) {
        self.axis.step(dir);
        self.last_step_us = Some(now);
        self.steps_taken = self.steps_taken.saturating_add(1);
    }

    fn finish(&mut self, state: State) {
        self.axis.set_resolution(Resolution::Full);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;

    const FULL_US: u32 = 100;
    const FINE_US: u32 = 400;

    struct TestClock {
        now: Cell<u64>,
    }

    impl TestClock {
        fn new() -> Self {
            Self { now: Cell::new(0) }
        }

        fn advance(&self, us: u64) {
            self.now.set(self.now.get() + us);
        }
    }

    impl Monotonic for TestClock {
        fn now_us(&self) -> u64 {
            self.now.get()
        }
    }

    /// Axis whose absolute position is shared with the simulated sensor
    struct SimAxis<'p> {
        abs: &'p Cell<i32>,
        origin: i32,
        resolution: Resolution,
        homed: bool,
        zeroed_at: Option<i32>,
        fine_steps: u32,
        fail_zero: bool,
    }

    impl<'p> SimAxis<'p> {
        fn new(abs: &'p Cell<i32>) -> Self {
            Self {
                abs,
                origin: 0,
                resolution: Resolution::Full,
                homed: true,
                zeroed_at: None,
                fine_steps: 0,
                fail_zero: false,
            }
        }
    }

    impl StepAxis for SimAxis<'_> {
        fn step(&mut self, dir: Direction) {
            self.abs.set(self.abs.get() + dir.sign());
            if self.resolution == Resolution::Fine {
                self.fine_steps += 1;
            }
        }

        fn position(&self) -> i32 {
            self.abs.get() - self.origin
        }

        fn set_resolution(&mut self, resolution: Resolution) {
            self.resolution = resolution;
        }

        fn resolution(&self) -> Resolution {
            self.resolution
        }

        fn step_interval_us(&self) -> u32 {
            match self.resolution {
                Resolution::Full => FULL_US,
                Resolution::Fine => FINE_US,
            }
        }

        fn invalidate_reference(&mut self) {
            self.homed = false;
        }

        fn set_zero(&mut self) -> Result<(), SensorError> {
            if self.fail_zero {
                return Err(SensorError::ConversionError);
            }
            self.origin = self.abs.get();
            self.zeroed_at = Some(self.abs.get());
            self.homed = true;
            Ok(())
        }

        fn is_homed(&self) -> bool {
            self.homed
        }
    }

    /// Sensor active over an inclusive range of absolute positions
    struct ZoneSensor<'p> {
        abs: &'p Cell<i32>,
        zone: Option<(i32, i32)>,
    }

    impl ProximitySensor for ZoneSensor<'_> {
        fn is_active(&mut self) -> bool {
            match self.zone {
                Some((lo, hi)) => (lo..=hi).contains(&self.abs.get()),
                None => false,
            }
        }
    }

    fn config(first: u32, reverse: u32) -> HomingConfig {
        HomingConfig {
            initial_direction: Direction::Forward,
            first_sweep_steps: first,
            reverse_sweep_steps: reverse,
            max_zone_steps: 50,
            timeout_ms: 30_000,
        }
    }

    fn run<A: StepAxis, S: ProximitySensor>(
        homing: &mut HomingController<'_, A, S, TestClock>,
        clock: &TestClock,
    ) -> HomingStatus {
        for _ in 0..100_000 {
            let status = homing.poll();
            if status.is_finished() {
                return status;
            }
            clock.advance(u64::from(FINE_US));
        }
        panic!("homing did not finish");
    }

    fn home(start: i32, zone: Option<(i32, i32)>, cfg: HomingConfig) -> (HomingStatus, i32, u32) {
        let abs = Cell::new(start);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        let mut sensor = ZoneSensor { abs: &abs, zone };

        let mut homing = HomingController::new(&mut axis, &mut sensor, &clock, cfg);
        let status = run(&mut homing, &clock);
        let steps = homing.steps_taken();
        (status, abs.get(), steps)
    }

    #[test]
    fn test_finds_zone_centre() {
        let abs = Cell::new(0);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        let mut sensor = ZoneSensor {
            abs: &abs,
            zone: Some((10, 20)),
        };

        let status = {
            let mut homing = HomingController::new(&mut axis, &mut sensor, &clock, config(100, 200));
            run(&mut homing, &clock)
        };

        match status {
            HomingStatus::Done(outcome) => {
                assert_eq!(outcome.zero_offset_steps, 15);
                assert_eq!(outcome.edge_entry, 10);
                assert_eq!(outcome.edge_exit, 20);
                // 10 to reach the zone, 11 through it, 6 back to the centre
                assert_eq!(outcome.steps_taken, 27);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(axis.is_homed());
        assert_eq!(axis.zeroed_at, Some(15));
        assert_eq!(axis.position(), 0);
        assert_eq!(axis.resolution(), Resolution::Full);
        assert!(axis.fine_steps > 0);
    }

    #[test]
    fn test_reverse_sweep_finds_zone_behind() {
        let (status, abs, _) = home(50, Some((10, 20)), config(40, 200));
        match status {
            HomingStatus::Done(outcome) => {
                assert_eq!(outcome.edge_entry, 20);
                assert_eq!(outcome.edge_exit, 10);
                assert_eq!(outcome.zero_offset_steps, 15);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(abs, 15);
    }

    #[test]
    fn test_start_inside_zone_backs_out_first() {
        let (status, abs, _) = home(17, Some((10, 20)), config(100, 200));
        match status {
            HomingStatus::Done(outcome) => {
                assert_eq!(outcome.edge_entry, 10);
                assert_eq!(outcome.edge_exit, 20);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(abs, 15);
    }

    #[test]
    fn test_sensor_never_found_uses_exact_budget() {
        let (status, abs, steps) = home(0, None, config(30, 70));
        assert_eq!(status, HomingStatus::Failed(HomingError::SensorNotFound));
        assert_eq!(steps, 100);
        assert_eq!(abs, 30 - 70);
    }

    #[test]
    fn test_single_sweep_budget() {
        let (status, _, steps) = home(0, None, config(25, 0));
        assert_eq!(status, HomingStatus::Failed(HomingError::SensorNotFound));
        assert_eq!(steps, 25);
    }

    #[test]
    fn test_zone_too_wide_when_starting_inside() {
        let (status, _, steps) = home(0, Some((-1000, 1000)), config(100, 200));
        assert_eq!(status, HomingStatus::Failed(HomingError::ZoneTooWide));
        assert_eq!(steps, 50);
    }

    #[test]
    fn test_zone_too_wide_while_tracking() {
        let (status, _, _) = home(0, Some((10, 500)), config(100, 200));
        assert_eq!(status, HomingStatus::Failed(HomingError::MoveTimeout));
    }

    #[test]
    fn test_wall_clock_timeout() {
        let abs = Cell::new(0);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        let mut sensor = ZoneSensor { abs: &abs, zone: None };
        let cfg = HomingConfig {
            timeout_ms: 5,
            ..config(1_000, 1_000)
        };

        let mut homing = HomingController::new(&mut axis, &mut sensor, &clock, cfg);
        assert!(!homing.poll().is_finished());
        clock.advance(5_000);
        assert_eq!(homing.poll(), HomingStatus::Failed(HomingError::Timeout));
        assert_eq!(homing.steps_taken(), 1);
    }

    #[test]
    fn test_steps_are_paced() {
        let abs = Cell::new(0);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        let mut sensor = ZoneSensor { abs: &abs, zone: None };

        let mut homing = HomingController::new(&mut axis, &mut sensor, &clock, config(100, 0));
        homing.poll();
        homing.poll();
        homing.poll();
        assert_eq!(homing.steps_taken(), 1);

        clock.advance(u64::from(FULL_US) - 1);
        homing.poll();
        assert_eq!(homing.steps_taken(), 1);

        clock.advance(1);
        homing.poll();
        assert_eq!(homing.steps_taken(), 2);
        drop(homing);
        assert_eq!(abs.get(), 2);
    }

    #[test]
    fn test_abort_leaves_axis_unhomed() {
        let abs = Cell::new(0);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        let mut sensor = ZoneSensor {
            abs: &abs,
            zone: Some((10, 20)),
        };
        assert!(axis.is_homed());

        {
            let mut homing =
                HomingController::new(&mut axis, &mut sensor, &clock, config(100, 200));
            for _ in 0..15 {
                homing.poll();
                clock.advance(u64::from(FINE_US));
            }
            assert_eq!(homing.phase(), Some(HomingPhase::Tracking));
            assert_eq!(homing.edges(), (Some(10), None));

            homing.abort();
            assert_eq!(homing.phase(), None);
            let steps = homing.steps_taken();
            clock.advance(u64::from(FINE_US));
            assert_eq!(homing.poll(), HomingStatus::Failed(HomingError::Aborted));
            assert_eq!(homing.steps_taken(), steps);
        }

        assert!(!axis.is_homed());
        assert_eq!(axis.zeroed_at, None);
        assert_eq!(axis.resolution(), Resolution::Full);
    }

    #[test]
    fn test_feedback_error_on_zero() {
        let abs = Cell::new(0);
        let clock = TestClock::new();
        let mut axis = SimAxis::new(&abs);
        axis.fail_zero = true;
        let mut sensor = ZoneSensor {
            abs: &abs,
            zone: Some((4, 8)),
        };

        let status = {
            let mut homing = HomingController::new(&mut axis, &mut sensor, &clock, config(100, 0));
            run(&mut homing, &clock)
        };
        assert_eq!(
            status,
            HomingStatus::Failed(HomingError::Feedback(SensorError::ConversionError))
        );
        assert!(!axis.is_homed());
    }

    #[test]
    fn test_single_step_zone() {
        let (status, abs, _) = home(0, Some((7, 7)), config(100, 0));
        match status {
            HomingStatus::Done(outcome) => {
                assert_eq!(outcome.edge_entry, 7);
                assert_eq!(outcome.edge_exit, 7);
                assert_eq!(outcome.zero_offset_steps, 7);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(abs, 7);
    }

    proptest! {
        #[test]
        fn prop_converges_to_zone_centre(
            p0 in -100i32..100,
            width in 1i32..40,
            start in -150i32..150,
        ) {
            let p1 = p0 + width - 1;
            let (status, abs, _) = home(start, Some((p0, p1)), config(300, 700));
            let centre = (p0 + p1) / 2;
            prop_assert!(matches!(status, HomingStatus::Done(_)), "{:?}", status);
            prop_assert_eq!(abs, centre);
        }
    }
}
