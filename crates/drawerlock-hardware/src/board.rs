//! The set of peripherals wired to one drawer.
//!
//! A [`Board`] owns one boxed instance of every collaborator the controller
//! talks to. Bootstrap code assembles it once with [`Board::builder`] and
//! hands it to the controller, which keeps exclusive ownership for the life
//! of the process.
//!
//! # Examples
//!
//! ```
//! use drawerlock_hardware::Board;
//! use drawerlock_hardware::mock::{
//!     MemoryLogSink, MockClock, MockDirectionalInput, MockDisplay, MockLock, MockMotionSensor,
//!     MockTone,
//! };
//!
//! let (clock, _clock_handle) = MockClock::new();
//! let (motion, _motion_handle) = MockMotionSensor::new();
//! let (stick, _stick_handle) = MockDirectionalInput::new();
//! let (tone, _tone_handle) = MockTone::new();
//! let (lock, _lock_handle) = MockLock::new();
//! let (display, _display_handle) = MockDisplay::new();
//! let (log, _log_handle) = MemoryLogSink::new();
//!
//! let board = Board::builder()
//!     .clock(clock)
//!     .motion(motion)
//!     .input(stick)
//!     .tone(tone)
//!     .lock(lock)
//!     .display(display)
//!     .log(log)
//!     .build()
//!     .unwrap();
//!
//! assert!(!board.calendar.is_available());
//! ```

use std::fmt;

use crate::error::{HardwareError, Result};
use crate::traits::{
    Calendar, Display, DirectionalInput, LockActuator, LogSink, MonotonicClock, MotionSensor,
    NoCalendar, ToneOutput,
};

/// Peripherals of one drawer, owned by the controller.
pub struct Board {
    pub clock: Box<dyn MonotonicClock>,
    pub motion: Box<dyn MotionSensor>,
    pub input: Box<dyn DirectionalInput>,
    pub tone: Box<dyn ToneOutput>,
    pub lock: Box<dyn LockActuator>,
    pub display: Box<dyn Display>,
    pub calendar: Box<dyn Calendar>,
    pub log: Box<dyn LogSink>,
}

impl Board {
    pub fn builder() -> BoardBuilder {
        BoardBuilder::default()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("now_ms", &self.clock.now_ms())
            .field("calendar_available", &self.calendar.is_available())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Board`].
///
/// Every peripheral except the calendar is required; a board without a
/// calendar uses [`NoCalendar`].
#[derive(Default)]
pub struct BoardBuilder {
    clock: Option<Box<dyn MonotonicClock>>,
    motion: Option<Box<dyn MotionSensor>>,
    input: Option<Box<dyn DirectionalInput>>,
    tone: Option<Box<dyn ToneOutput>>,
    lock: Option<Box<dyn LockActuator>>,
    display: Option<Box<dyn Display>>,
    calendar: Option<Box<dyn Calendar>>,
    log: Option<Box<dyn LogSink>>,
}

impl BoardBuilder {
    pub fn clock(mut self, clock: impl MonotonicClock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn motion(mut self, motion: impl MotionSensor + 'static) -> Self {
        self.motion = Some(Box::new(motion));
        self
    }

    pub fn input(mut self, input: impl DirectionalInput + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn tone(mut self, tone: impl ToneOutput + 'static) -> Self {
        self.tone = Some(Box::new(tone));
        self
    }

    pub fn lock(mut self, lock: impl LockActuator + 'static) -> Self {
        self.lock = Some(Box::new(lock));
        self
    }

    pub fn display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn calendar(mut self, calendar: impl Calendar + 'static) -> Self {
        self.calendar = Some(Box::new(calendar));
        self
    }

    pub fn log(mut self, log: impl LogSink + 'static) -> Self {
        self.log = Some(Box::new(log));
        self
    }

    /// Assemble the board.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` naming the first missing
    /// required peripheral.
    pub fn build(self) -> Result<Board> {
        Ok(Board {
            clock: required(self.clock, "clock")?,
            motion: required(self.motion, "motion sensor")?,
            input: required(self.input, "directional input")?,
            tone: required(self.tone, "tone output")?,
            lock: required(self.lock, "lock actuator")?,
            display: required(self.display, "display")?,
            calendar: self.calendar.unwrap_or_else(|| Box::new(NoCalendar)),
            log: required(self.log, "log sink")?,
        })
    }
}

fn required<T: ?Sized>(slot: Option<Box<T>>, name: &str) -> Result<Box<T>> {
    slot.ok_or_else(|| HardwareError::configuration(format!("board is missing a {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryLogSink, MockClock, MockDisplay, MockLock, MockTone};

    #[test]
    fn test_build_reports_missing_peripheral() {
        let (clock, _) = MockClock::new();
        let (tone, _) = MockTone::new();
        let (lock, _) = MockLock::new();
        let (display, _) = MockDisplay::new();
        let (log, _) = MemoryLogSink::new();

        let result = Board::builder()
            .clock(clock)
            .tone(tone)
            .lock(lock)
            .display(display)
            .log(log)
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, HardwareError::ConfigurationError { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error: board is missing a motion sensor"
        );
    }
}
