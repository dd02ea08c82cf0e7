//! Mock peripheral implementations for testing and development.
//!
//! Every mock is created as a `(device, handle)` pair. The device goes into a
//! [`Board`](crate::Board); the handle stays with the test or simulator and
//! is used to drive inputs and inspect what the controller commanded. Handles
//! are cheap to clone and share state with their device.

pub mod clock;
pub mod outputs;
pub mod records;
pub mod sensors;

// Re-export commonly used types
pub use clock::{MockClock, MockClockHandle};
pub use outputs::{MockDisplay, MockDisplayHandle, MockLock, MockLockHandle, MockTone, MockToneHandle};
pub use records::{LogRecord, MemoryLogSink, MemoryLogSinkHandle, MockCalendar, MockCalendarHandle};
pub use sensors::{
    MockDirectionalInput, MockDirectionalInputHandle, MockMotionSensor, MockMotionSensorHandle,
};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock shared mock state, recovering it if a panicking test poisoned it.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
