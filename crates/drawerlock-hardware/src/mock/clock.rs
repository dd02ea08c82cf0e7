//! Simulated monotonic clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::MonotonicClock;

/// Mock clock whose time only moves when told to.
///
/// Time advances through [`MockClockHandle::advance`] or through blocking
/// calls ([`MonotonicClock::delay_ms`], and tone pulses of a
/// [`MockTone`](super::MockTone) attached to the handle), so tests control
/// every millisecond the controller observes.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MockClock;
/// use drawerlock_hardware::traits::MonotonicClock;
///
/// let (mut clock, handle) = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// handle.advance(250);
/// clock.delay_ms(50);
/// assert_eq!(clock.now_ms(), 300);
/// ```
#[derive(Debug)]
pub struct MockClock {
    now: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a clock starting at 0 ms.
    pub fn new() -> (Self, MockClockHandle) {
        Self::starting_at(0)
    }

    pub fn starting_at(start_ms: u64) -> (Self, MockClockHandle) {
        let now = Arc::new(AtomicU64::new(start_ms));
        let handle = MockClockHandle {
            now: Arc::clone(&now),
        };
        (Self { now }, handle)
    }
}

impl MonotonicClock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn delay_ms(&mut self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

/// Handle for moving a [`MockClock`] forward.
#[derive(Debug, Clone)]
pub struct MockClockHandle {
    now: Arc<AtomicU64>,
}

impl MockClockHandle {
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
