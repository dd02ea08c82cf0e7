//! Mock calendar chip and in-memory audit log.

use std::sync::{Arc, Mutex};

use drawerlock_core::TimeOfDay;

use super::lock_state;
use crate::error::{HardwareError, Result};
use crate::traits::{Calendar, LogSink};

/// Mock real-time clock with a settable time and availability.
///
/// # Examples
///
/// ```
/// use drawerlock_core::TimeOfDay;
/// use drawerlock_hardware::mock::MockCalendar;
/// use drawerlock_hardware::traits::Calendar;
///
/// let (mut calendar, handle) = MockCalendar::new(TimeOfDay::new(8, 30, 0).unwrap());
/// assert_eq!(calendar.now().unwrap().to_string(), "08:30:00");
///
/// handle.set_available(false);
/// assert!(!calendar.is_available());
/// assert!(calendar.now().is_err());
/// ```
#[derive(Debug)]
pub struct MockCalendar {
    state: Arc<Mutex<CalendarState>>,
}

#[derive(Debug)]
struct CalendarState {
    time: TimeOfDay,
    available: bool,
}

impl MockCalendar {
    pub fn new(time: TimeOfDay) -> (Self, MockCalendarHandle) {
        let state = Arc::new(Mutex::new(CalendarState {
            time,
            available: true,
        }));
        let handle = MockCalendarHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl Calendar for MockCalendar {
    fn is_available(&self) -> bool {
        lock_state(&self.state).available
    }

    fn now(&mut self) -> Result<TimeOfDay> {
        let state = lock_state(&self.state);
        if !state.available {
            return Err(HardwareError::disconnected("mock calendar"));
        }
        Ok(state.time)
    }
}

/// Handle for controlling a [`MockCalendar`].
#[derive(Debug, Clone)]
pub struct MockCalendarHandle {
    state: Arc<Mutex<CalendarState>>,
}

impl MockCalendarHandle {
    pub fn set_time(&self, time: TimeOfDay) {
        lock_state(&self.state).time = time;
    }

    pub fn set_available(&self, available: bool) {
        lock_state(&self.state).available = available;
    }
}

/// One audit record as received by a log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub event: String,
    pub timestamp: Option<TimeOfDay>,
}

/// Log sink keeping every record in memory.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MemoryLogSink;
/// use drawerlock_hardware::traits::LogSink;
///
/// let (mut sink, handle) = MemoryLogSink::new();
/// sink.record("ACCESS GRANTED", None);
///
/// assert_eq!(handle.count_containing("GRANTED"), 1);
/// assert_eq!(handle.records()[0].timestamp, None);
/// ```
#[derive(Debug)]
pub struct MemoryLogSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogSink {
    pub fn new() -> (Self, MemoryLogSinkHandle) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let handle = MemoryLogSinkHandle {
            records: Arc::clone(&records),
        };
        (Self { records }, handle)
    }
}

impl LogSink for MemoryLogSink {
    fn record(&mut self, event: &str, timestamp: Option<TimeOfDay>) {
        lock_state(&self.records).push(LogRecord {
            event: event.to_string(),
            timestamp,
        });
    }
}

/// Handle for reading a [`MemoryLogSink`].
#[derive(Debug, Clone)]
pub struct MemoryLogSinkHandle {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemoryLogSinkHandle {
    pub fn records(&self) -> Vec<LogRecord> {
        lock_state(&self.records).clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        lock_state(&self.records)
            .iter()
            .filter(|record| record.event.contains(needle))
            .count()
    }
}
