//! Mock input devices: presence sensor and analog stick.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use drawerlock_core::constants::AXIS_CENTER;

use super::lock_state;
use crate::error::{HardwareError, Result};
use crate::traits::{DirectionalInput, MotionSensor};

/// Mock presence sensor driven by a level the handle sets.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MockMotionSensor;
/// use drawerlock_hardware::traits::MotionSensor;
///
/// let (mut sensor, handle) = MockMotionSensor::new();
/// assert!(!sensor.read().unwrap());
///
/// handle.set_present(true);
/// assert!(sensor.read().unwrap());
///
/// handle.fail_next_read();
/// assert!(sensor.read().is_err());
/// ```
#[derive(Debug)]
pub struct MockMotionSensor {
    shared: Arc<MotionShared>,
}

#[derive(Debug, Default)]
struct MotionShared {
    present: AtomicBool,
    fail_next: AtomicBool,
}

impl MockMotionSensor {
    pub fn new() -> (Self, MockMotionSensorHandle) {
        let shared = Arc::new(MotionShared::default());
        let handle = MockMotionSensorHandle {
            shared: Arc::clone(&shared),
        };
        (Self { shared }, handle)
    }
}

impl MotionSensor for MockMotionSensor {
    fn read(&mut self) -> Result<bool> {
        if self.shared.fail_next.swap(false, Ordering::SeqCst) {
            return Err(HardwareError::communication("motion sensor read failed"));
        }
        Ok(self.shared.present.load(Ordering::SeqCst))
    }
}

/// Handle for driving a [`MockMotionSensor`].
#[derive(Debug, Clone)]
pub struct MockMotionSensorHandle {
    shared: Arc<MotionShared>,
}

impl MockMotionSensorHandle {
    pub fn set_present(&self, present: bool) {
        self.shared.present.store(present, Ordering::SeqCst);
    }

    /// Make the next read return a communication error.
    pub fn fail_next_read(&self) {
        self.shared.fail_next.store(true, Ordering::SeqCst);
    }
}

/// Mock analog stick with confirm control.
///
/// Axes rest at the center and the confirm line rests high (released).
/// Besides steady levels, the handle can queue one-shot readings that are
/// consumed before the steady level is reported again, which is how tests
/// produce a single-sample deflection or a bouncing contact.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MockDirectionalInput;
/// use drawerlock_hardware::traits::DirectionalInput;
///
/// let (mut stick, handle) = MockDirectionalInput::new();
///
/// // Contact bounce: low on the first read, back high on the re-check.
/// handle.queue_confirm_levels([false, true]);
/// assert!(!stick.read_confirm().unwrap());
/// assert!(stick.read_confirm().unwrap());
/// assert!(stick.read_confirm().unwrap());
/// ```
#[derive(Debug)]
pub struct MockDirectionalInput {
    state: Arc<Mutex<StickState>>,
}

#[derive(Debug)]
struct StickState {
    axes: (u16, u16),
    queued_axes: VecDeque<(u16, u16)>,
    confirm_level: bool,
    queued_confirm: VecDeque<bool>,
    fail_next: bool,
}

impl Default for StickState {
    fn default() -> Self {
        Self {
            axes: (AXIS_CENTER, AXIS_CENTER),
            queued_axes: VecDeque::new(),
            confirm_level: true,
            queued_confirm: VecDeque::new(),
            fail_next: false,
        }
    }
}

impl MockDirectionalInput {
    pub fn new() -> (Self, MockDirectionalInputHandle) {
        let state = Arc::new(Mutex::new(StickState::default()));
        let handle = MockDirectionalInputHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl DirectionalInput for MockDirectionalInput {
    fn read_axes(&mut self) -> Result<(u16, u16)> {
        let mut state = lock_state(&self.state);
        if std::mem::take(&mut state.fail_next) {
            return Err(HardwareError::communication("analog sampler read failed"));
        }
        Ok(state.queued_axes.pop_front().unwrap_or(state.axes))
    }

    fn read_confirm(&mut self) -> Result<bool> {
        let mut state = lock_state(&self.state);
        Ok(state
            .queued_confirm
            .pop_front()
            .unwrap_or(state.confirm_level))
    }
}

/// Handle for driving a [`MockDirectionalInput`].
#[derive(Debug, Clone)]
pub struct MockDirectionalInputHandle {
    state: Arc<Mutex<StickState>>,
}

impl MockDirectionalInputHandle {
    /// Set the steady `(horizontal, vertical)` reading.
    pub fn set_axes(&self, horizontal: u16, vertical: u16) {
        lock_state(&self.state).axes = (horizontal, vertical);
    }

    pub fn center(&self) {
        self.set_axes(AXIS_CENTER, AXIS_CENTER);
    }

    /// Queue readings returned once each before the steady reading.
    pub fn queue_axes(&self, readings: impl IntoIterator<Item = (u16, u16)>) {
        lock_state(&self.state).queued_axes.extend(readings);
    }

    /// Hold the confirm control down (line low).
    pub fn press_confirm(&self) {
        lock_state(&self.state).confirm_level = false;
    }

    /// Release the confirm control (line high).
    pub fn release_confirm(&self) {
        lock_state(&self.state).confirm_level = true;
    }

    /// Queue confirm levels returned once each before the steady level.
    pub fn queue_confirm_levels(&self, levels: impl IntoIterator<Item = bool>) {
        lock_state(&self.state).queued_confirm.extend(levels);
    }

    /// Make the next axes read return a communication error.
    pub fn fail_next_read(&self) {
        lock_state(&self.state).fail_next = true;
    }
}
