//! Peripheral trait definitions.
//!
//! These traits are the contract between the access controller and the
//! drawer's peripherals. The controller only ever talks to hardware through
//! them, which is what lets the mock implementations in [`crate::mock`] stand
//! in for the real board in tests and in the simulator.
//!
//! All calls are synchronous. Calls documented as blocking (tone pulses,
//! delays) stall the polling loop for their duration; that is the accepted
//! cost of running feedback inline instead of scheduling it.
//!
//! Every trait requires `Send` so a [`Board`](crate::Board) can be moved into
//! whatever thread or task drives the loop.

use drawerlock_core::TimeOfDay;

use crate::error::Result;

/// Monotonic millisecond time source.
///
/// All controller timers are deadline comparisons against this clock. It
/// must never go backwards.
pub trait MonotonicClock: Send {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Block for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u64);
}

/// Binary presence sensor (PIR or similar).
pub trait MotionSensor: Send {
    /// Returns `true` while presence is detected.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor cannot be read.
    fn read(&mut self) -> Result<bool>;
}

/// Two-axis analog stick with a confirm control.
///
/// # Examples
///
/// ```
/// use drawerlock_hardware::mock::MockDirectionalInput;
/// use drawerlock_hardware::traits::DirectionalInput;
///
/// let (mut stick, handle) = MockDirectionalInput::new();
/// handle.set_axes(512, 100);
///
/// let (horizontal, vertical) = stick.read_axes().unwrap();
/// assert_eq!((horizontal, vertical), (512, 100));
/// ```
pub trait DirectionalInput: Send {
    /// Read `(horizontal, vertical)` magnitudes in sampler units.
    ///
    /// # Errors
    ///
    /// Returns an error if the analog channels cannot be sampled.
    fn read_axes(&mut self) -> Result<(u16, u16)>;

    /// Read the raw confirm level (`true` = high).
    ///
    /// The control is wired with a pull-up, so a press reads low.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    fn read_confirm(&mut self) -> Result<bool>;
}

/// Piezo buzzer or similar tone output.
pub trait ToneOutput: Send {
    /// Sound a pulse for `duration_ms`, then silence. Blocks for the duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be driven.
    fn emit(&mut self, duration_ms: u64) -> Result<()>;
}

/// Lock servo/solenoid driver.
///
/// The controller never reads the position back; it trusts its last command.
pub trait LockActuator: Send {
    /// # Errors
    ///
    /// Returns an error if the actuator could not be driven.
    fn set_position(&mut self, locked: bool) -> Result<()>;
}

/// Two-line character display.
pub trait Display: Send {
    /// Replace the whole screen with the given lines.
    ///
    /// Lines arrive already formatted and padded to the display width.
    ///
    /// # Errors
    ///
    /// Returns an error if the display could not be written.
    fn render(&mut self, lines: &[String; 2]) -> Result<()>;
}

/// Optional real-time clock, used only for display and log timestamps.
pub trait Calendar: Send {
    /// Whether the clock chip was found.
    fn is_available(&self) -> bool;

    /// Current time of day.
    ///
    /// # Errors
    ///
    /// Returns an error if the chip is missing or returned an invalid time.
    fn now(&mut self) -> Result<TimeOfDay>;
}

/// Append-only audit log channel.
pub trait LogSink: Send {
    /// Record a security event. Fire-and-forget.
    fn record(&mut self, event: &str, timestamp: Option<TimeOfDay>);
}

/// Calendar used when the board has no clock chip.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

impl Calendar for NoCalendar {
    fn is_available(&self) -> bool {
        false
    }

    fn now(&mut self) -> Result<TimeOfDay> {
        Err(crate::HardwareError::disconnected("calendar"))
    }
}
