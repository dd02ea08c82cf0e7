//! Shared harness for controller integration tests.
//!
//! [`Harness`] wires an [`AccessController`] to a full set of mocks on a
//! simulated clock. Tone pulses advance the same clock, so every blocking
//! stall the controller performs shows up in simulated time exactly as it
//! would on the board.

#![allow(dead_code)]

use drawerlock_controller::{AccessController, ControllerConfig, StateTransition};
use drawerlock_core::constants::{AXIS_CENTER, AXIS_MAX, GESTURE_INTERVAL_MS};
use drawerlock_core::{Direction, SystemState, TimeOfDay};
use drawerlock_hardware::Board;
use drawerlock_hardware::mock::{
    MemoryLogSink, MemoryLogSinkHandle, MockCalendar, MockCalendarHandle, MockClock,
    MockClockHandle, MockDirectionalInput, MockDirectionalInputHandle, MockDisplay,
    MockDisplayHandle, MockLock, MockLockHandle, MockMotionSensor, MockMotionSensorHandle,
    MockTone, MockToneHandle,
};

/// Time the mock calendar reports.
pub fn calendar_time() -> TimeOfDay {
    TimeOfDay::new(12, 34, 56).unwrap()
}

pub struct Harness {
    pub controller: AccessController,
    pub clock: MockClockHandle,
    pub motion: MockMotionSensorHandle,
    pub stick: MockDirectionalInputHandle,
    pub tone: MockToneHandle,
    pub lock: MockLockHandle,
    pub display: MockDisplayHandle,
    pub log: MemoryLogSinkHandle,
    pub calendar: Option<MockCalendarHandle>,
}

impl Harness {
    /// Default configuration with a working calendar.
    pub fn new() -> Self {
        Self::build(ControllerConfig::default(), true)
    }

    /// Default configuration and no calendar fitted.
    pub fn without_calendar() -> Self {
        Self::build(ControllerConfig::default(), false)
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self::build(config, true)
    }

    fn build(config: ControllerConfig, with_calendar: bool) -> Self {
        let (clock, clock_handle) = MockClock::starting_at(1_000);
        let (motion, motion_handle) = MockMotionSensor::new();
        let (stick, stick_handle) = MockDirectionalInput::new();
        let (tone, tone_handle) = MockTone::with_clock(clock_handle.clone());
        let (lock, lock_handle) = MockLock::new();
        let (display, display_handle) = MockDisplay::new();
        let (log, log_handle) = MemoryLogSink::new();

        let mut builder = Board::builder()
            .clock(clock)
            .motion(motion)
            .input(stick)
            .tone(tone)
            .lock(lock)
            .display(display)
            .log(log);

        let calendar = if with_calendar {
            let (calendar, calendar_handle) = MockCalendar::new(calendar_time());
            builder = builder.calendar(calendar);
            Some(calendar_handle)
        } else {
            None
        };

        let board = builder.build().unwrap();

        Self {
            controller: AccessController::new(config, board),
            clock: clock_handle,
            motion: motion_handle,
            stick: stick_handle,
            tone: tone_handle,
            lock: lock_handle,
            display: display_handle,
            log: log_handle,
            calendar,
        }
    }

    pub fn state(&self) -> SystemState {
        self.controller.state()
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Advance simulated time, then run one polling iteration.
    pub fn tick(&mut self, ms: u64) -> Option<StateTransition> {
        self.clock.advance(ms);
        self.controller.poll()
    }

    /// Move the clock to an absolute time, then poll.
    pub fn poll_at(&mut self, at_ms: u64) -> Option<StateTransition> {
        let now = self.now();
        assert!(at_ms >= now, "cannot move the clock back from {now} to {at_ms}");
        self.tick(at_ms - now)
    }

    /// Pulse the presence sensor for one iteration.
    pub fn trigger_motion(&mut self) -> Option<StateTransition> {
        self.motion.set_present(true);
        let transition = self.controller.poll();
        self.motion.set_present(false);
        transition
    }

    /// Deflect the stick for one iteration after the gesture spacing
    /// has elapsed, then return it to center.
    pub fn gesture(&mut self, direction: Direction) -> Option<StateTransition> {
        self.deflect(direction);
        let transition = self.tick(GESTURE_INTERVAL_MS);
        self.stick.center();
        transition
    }

    /// Hold the stick in `direction` without polling.
    pub fn deflect(&mut self, direction: Direction) {
        let (horizontal, vertical) = match direction {
            Direction::Up => (AXIS_CENTER, 0),
            Direction::Down => (AXIS_CENTER, AXIS_MAX),
            Direction::Left => (0, AXIS_CENTER),
            Direction::Right => (AXIS_MAX, AXIS_CENTER),
        };
        self.stick.set_axes(horizontal, vertical);
    }

    pub fn enter(&mut self, code: &str) {
        for symbol in code.chars() {
            self.gesture(Direction::from_symbol(symbol).unwrap());
        }
    }

    /// Press confirm for one iteration, then release it.
    pub fn confirm(&mut self) -> Option<StateTransition> {
        self.stick.press_confirm();
        let transition = self.controller.poll();
        self.stick.release_confirm();
        transition
    }

    /// Enter a full code, confirm it, and run the verification iteration.
    ///
    /// Returns the transition out of `Verifying`.
    pub fn submit(&mut self, code: &str) -> Option<StateTransition> {
        self.enter(code);
        let confirmed = self.confirm().expect("confirm should start verification");
        assert_eq!(confirmed.to, SystemState::Verifying);
        self.controller.poll()
    }

    /// Motion followed by a full submission.
    pub fn attempt(&mut self, code: &str) -> Option<StateTransition> {
        if self.state() == SystemState::Idle {
            let started = self.trigger_motion().expect("motion should start code entry");
            assert_eq!(started.to, SystemState::CollectingCode);
        }
        self.submit(code)
    }

    /// Current display lines with padding removed on both ends.
    pub fn screen(&self) -> [String; 2] {
        let [top, bottom] = self.display.current().expect("nothing rendered yet");
        [top.trim().to_string(), bottom.trim().to_string()]
    }
}
