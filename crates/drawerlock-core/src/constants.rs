//! Core constants for the drawer access controller.
//!
//! This module centralizes every fixed timing window, threshold, and feedback
//! pattern used by the controller. The values here are the defaults; most of
//! them can be overridden through the controller configuration.
//!
//! # Timing Windows
//!
//! | Constant | Value | Purpose |
//! |----------|-------|---------|
//! | [`MOTION_COOLDOWN_MS`] | 2000 | Minimum spacing between accepted motion detections |
//! | [`CODE_ENTRY_TIMEOUT_MS`] | 30000 | Code entry window before returning to idle |
//! | [`UNLOCK_DURATION_MS`] | 10000 | Time the drawer stays unlocked |
//! | [`GESTURE_INTERVAL_MS`] | 300 | Minimum spacing between accepted direction symbols |
//! | [`CONFIRM_DEBOUNCE_MS`] | 500 | Minimum spacing between accepted confirm presses |
//!
//! # Usage
//!
//! ```
//! use drawerlock_core::constants::*;
//!
//! assert!(AXIS_LOW_THRESHOLD < AXIS_CENTER);
//! assert!(AXIS_CENTER < AXIS_HIGH_THRESHOLD);
//! assert_eq!(DEFAULT_SECRET, "UUDDLR");
//! ```

// ============================================================================
// Code Format
// ============================================================================

/// Number of direction symbols in a complete code.
pub const CODE_LENGTH: usize = 6;

/// Secret code used when no configuration overrides it.
pub const DEFAULT_SECRET: &str = "UUDDLR";

/// Consecutive failed verifications that trigger an alarm lockout.
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Character shown for every entered symbol in the masked progress indicator.
pub const MASK_ENTERED: char = '*';

/// Character shown for every remaining slot in the masked progress indicator.
pub const MASK_EMPTY: char = '_';

// ============================================================================
// Timing Windows (milliseconds)
// ============================================================================

pub const MOTION_COOLDOWN_MS: u64 = 2000;

pub const CODE_ENTRY_TIMEOUT_MS: u64 = 30_000;

pub const UNLOCK_DURATION_MS: u64 = 10_000;

pub const GESTURE_INTERVAL_MS: u64 = 300;

pub const CONFIRM_DEBOUNCE_MS: u64 = 500;

/// Settle time before the confirm level is re-read to reject contact bounce.
pub const CONFIRM_SETTLE_MS: u64 = 20;

/// How long the alarm lockout holds after the alarm pattern finished.
pub const LOCKOUT_SETTLE_MS: u64 = 5000;

/// Display refresh cadence for clock and countdown screens.
pub const DISPLAY_REFRESH_MS: u64 = 1000;

// ============================================================================
// Analog Stick
// ============================================================================

/// Full-scale reading of the 10-bit analog sampler.
pub const AXIS_MAX: u16 = 1023;

/// Nominal resting position of both axes.
pub const AXIS_CENTER: u16 = 512;

/// Readings below this value count as a deflection towards Up/Left.
pub const AXIS_LOW_THRESHOLD: u16 = 300;

/// Readings above this value count as a deflection towards Down/Right.
pub const AXIS_HIGH_THRESHOLD: u16 = 700;

// ============================================================================
// Display Geometry
// ============================================================================

pub const DISPLAY_LINES: usize = 2;

pub const DISPLAY_COLUMNS: usize = 16;

/// Shown instead of the time of day when no calendar is available.
pub const PLACEHOLDER_TIME: &str = "--:--:--";

// ============================================================================
// Tone Patterns (pulse durations in milliseconds)
// ============================================================================

/// Silence between two pulses of the same pattern.
pub const TONE_GAP_MS: u64 = 100;

pub const TONE_WELCOME: &[u64] = &[200, 100, 400];

pub const TONE_SUCCESS: &[u64] = &[200, 300, 400];

pub const TONE_FAILURE: &[u64] = &[400, 400, 400];

pub const TONE_ALARM: &[u64] = &[500, 500, 500, 500, 500];

pub const TONE_KEYPRESS: &[u64] = &[80];

/// Played when a symbol is entered into a full buffer or confirm is pressed early.
pub const TONE_REJECT: &[u64] = &[50, 50];

// ============================================================================
// History
// ============================================================================

/// Maximum number of state transitions kept in the controller history.
///
/// A full access cycle is four or five transitions, so this keeps roughly
/// twenty cycles around for inspection.
pub const MAX_HISTORY_SIZE: usize = 100;
