//! Host-backed peripherals: the process monotonic clock and the local
//! wall clock.

use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use drawerlock_core::TimeOfDay;

use crate::error::Result;
use crate::traits::{Calendar, MonotonicClock};

/// Monotonic clock counting milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn delay_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Calendar backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn is_available(&self) -> bool {
        true
    }

    fn now(&mut self) -> Result<TimeOfDay> {
        Ok(TimeOfDay::from_timelike(&Local::now()))
    }
}
