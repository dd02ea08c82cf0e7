//! Drawer access controller.
//!
//! This crate contains the state machine that turns presence detection and a
//! joystick gesture code into lock commands, together with the policy pieces
//! it is built from: input debouncing, gesture encoding, tone patterns,
//! screen composition and the audit event vocabulary.

pub mod config;
pub mod controller;
pub mod display;
pub mod event;
pub mod feedback;
pub mod gesture;
pub mod history;
pub mod input;

pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::{AccessController, ControllerStats};
pub use display::{Alignment, Screen, ScreenView, align_text, truncate_text};
pub use event::AccessEvent;
pub use feedback::TonePattern;
pub use gesture::GestureEncoder;
pub use history::{StateTransition, TransitionHistory};
pub use input::{ConfirmButton, InputSampler, MotionGate};
