//! Mock output devices: tone, lock actuator and display.
//!
//! Each one records every command it receives so tests can assert on the
//! exact feedback the controller produced.

use std::sync::{Arc, Mutex};

use super::{MockClockHandle, lock_state};
use crate::error::Result;
use crate::traits::{Display, LockActuator, ToneOutput};

/// Mock buzzer recording pulse durations.
///
/// When attached to a [`MockClockHandle`], every pulse advances simulated
/// time by its duration, mirroring the blocking behaviour of a real buzzer.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::{MockClock, MockTone};
/// use drawerlock_hardware::traits::ToneOutput;
///
/// let (_clock, clock_handle) = MockClock::new();
/// let (mut tone, handle) = MockTone::with_clock(clock_handle.clone());
///
/// tone.emit(200).unwrap();
/// tone.emit(400).unwrap();
///
/// assert_eq!(handle.pulses(), vec![200, 400]);
/// assert_eq!(clock_handle.now_ms(), 600);
/// ```
#[derive(Debug)]
pub struct MockTone {
    pulses: Arc<Mutex<Vec<u64>>>,
    clock: Option<MockClockHandle>,
}

impl MockTone {
    /// Create a tone that does not advance time.
    pub fn new() -> (Self, MockToneHandle) {
        Self::build(None)
    }

    pub fn with_clock(clock: MockClockHandle) -> (Self, MockToneHandle) {
        Self::build(Some(clock))
    }

    fn build(clock: Option<MockClockHandle>) -> (Self, MockToneHandle) {
        let pulses = Arc::new(Mutex::new(Vec::new()));
        let handle = MockToneHandle {
            pulses: Arc::clone(&pulses),
        };
        (Self { pulses, clock }, handle)
    }
}

impl ToneOutput for MockTone {
    fn emit(&mut self, duration_ms: u64) -> Result<()> {
        lock_state(&self.pulses).push(duration_ms);
        if let Some(clock) = &self.clock {
            clock.advance(duration_ms);
        }
        Ok(())
    }
}

/// Handle for inspecting a [`MockTone`].
#[derive(Debug, Clone)]
pub struct MockToneHandle {
    pulses: Arc<Mutex<Vec<u64>>>,
}

impl MockToneHandle {
    /// All pulses emitted so far, in order.
    pub fn pulses(&self) -> Vec<u64> {
        lock_state(&self.pulses).clone()
    }

    /// Count non-overlapping occurrences of `pattern` in the pulse history.
    pub fn count_pattern(&self, pattern: &[u64]) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        let pulses = lock_state(&self.pulses);
        let mut count = 0;
        let mut i = 0;
        while i + pattern.len() <= pulses.len() {
            if pulses[i..i + pattern.len()] == *pattern {
                count += 1;
                i += pattern.len();
            } else {
                i += 1;
            }
        }
        count
    }

    pub fn clear(&self) {
        lock_state(&self.pulses).clear();
    }
}

/// Mock lock actuator recording every commanded position.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MockLock;
/// use drawerlock_hardware::traits::LockActuator;
///
/// let (mut lock, handle) = MockLock::new();
/// assert_eq!(handle.position(), None);
///
/// lock.set_position(true).unwrap();
/// lock.set_position(false).unwrap();
///
/// assert_eq!(handle.position(), Some(false));
/// assert_eq!(handle.commands(), vec![true, false]);
/// ```
#[derive(Debug)]
pub struct MockLock {
    commands: Arc<Mutex<Vec<bool>>>,
}

impl MockLock {
    pub fn new() -> (Self, MockLockHandle) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        let handle = MockLockHandle {
            commands: Arc::clone(&commands),
        };
        (Self { commands }, handle)
    }
}

impl LockActuator for MockLock {
    fn set_position(&mut self, locked: bool) -> Result<()> {
        lock_state(&self.commands).push(locked);
        Ok(())
    }
}

/// Handle for inspecting a [`MockLock`].
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    commands: Arc<Mutex<Vec<bool>>>,
}

impl MockLockHandle {
    /// Last commanded position (`true` = locked), if any.
    pub fn position(&self) -> Option<bool> {
        lock_state(&self.commands).last().copied()
    }

    pub fn commands(&self) -> Vec<bool> {
        lock_state(&self.commands).clone()
    }
}

/// Mock character display recording every rendered screen.
#[derive(Debug)]
pub struct MockDisplay {
    screens: Arc<Mutex<Vec<[String; 2]>>>,
}

impl MockDisplay {
    pub fn new() -> (Self, MockDisplayHandle) {
        let screens = Arc::new(Mutex::new(Vec::new()));
        let handle = MockDisplayHandle {
            screens: Arc::clone(&screens),
        };
        (Self { screens }, handle)
    }
}

impl Display for MockDisplay {
    fn render(&mut self, lines: &[String; 2]) -> Result<()> {
        lock_state(&self.screens).push(lines.clone());
        Ok(())
    }
}

/// Handle for inspecting a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    screens: Arc<Mutex<Vec<[String; 2]>>>,
}

impl MockDisplayHandle {
    /// Most recent screen with trailing padding removed.
    pub fn current(&self) -> Option<[String; 2]> {
        lock_state(&self.screens)
            .last()
            .map(|[top, bottom]| [top.trim_end().to_string(), bottom.trim_end().to_string()])
    }

    pub fn render_count(&self) -> usize {
        lock_state(&self.screens).len()
    }
}
