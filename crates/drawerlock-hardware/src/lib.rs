//! Peripheral abstraction layer for the drawer access controller.
//!
//! This crate defines the narrow interfaces through which the controller
//! reaches the drawer's hardware: presence sensor, analog stick with confirm
//! control, buzzer, lock actuator, character display, optional real-time
//! clock, and audit log channel. It also provides:
//!
//! - [`Board`], the bundle of boxed peripherals the controller owns;
//! - host-backed adapters in [`system`] (monotonic clock, local time);
//! - controllable mocks in [`mock`] for tests and the simulator.
//!
//! # Design
//!
//! - **Synchronous**: the controller is a single cooperative polling loop, so
//!   every call returns when the hardware is done. Tone pulses block.
//! - **Object-safe**: all traits work as `Box<dyn Trait>`.
//! - **Error-aware**: fallible operations return [`Result<T>`][error::Result]
//!   with a [`HardwareError`]; the controller decides how to degrade.
//!
//! # Examples
//!
//! ```
//! use drawerlock_hardware::mock::MockMotionSensor;
//! use drawerlock_hardware::traits::MotionSensor;
//!
//! fn someone_there<M: MotionSensor>(sensor: &mut M) -> bool {
//!     sensor.read().unwrap_or(false)
//! }
//!
//! let (mut sensor, handle) = MockMotionSensor::new();
//! handle.set_present(true);
//! assert!(someone_there(&mut sensor));
//! ```

pub mod board;
pub mod error;
pub mod mock;
pub mod system;
pub mod traits;

// Re-export commonly used types for convenience
pub use board::{Board, BoardBuilder};
pub use error::{HardwareError, Result};
pub use system::{LocalCalendar, SystemClock};
pub use traits::{
    Calendar, DirectionalInput, Display, LockActuator, LogSink, MonotonicClock, MotionSensor,
    NoCalendar, ToneOutput,
};
