//! Controller configuration.
//!
//! Every timing window, threshold and the secret code can be set from a JSON
//! document; fields left out take the defaults from
//! [`drawerlock_core::constants`].
//!
//! # Examples
//!
//! ```
//! use drawerlock_controller::ControllerConfig;
//!
//! let config = ControllerConfig::from_json_str(r#"{ "secret": "LRLRUD", "unlock_duration_ms": 15000 }"#)
//!     .unwrap();
//!
//! assert_eq!(config.unlock_duration_ms, 15_000);
//! assert_eq!(config.code_entry_timeout_ms, 30_000);
//! ```

use std::path::Path;

use drawerlock_core::constants::{
    AXIS_CENTER, AXIS_HIGH_THRESHOLD, AXIS_LOW_THRESHOLD, AXIS_MAX, CODE_ENTRY_TIMEOUT_MS,
    CONFIRM_DEBOUNCE_MS, CONFIRM_SETTLE_MS, DISPLAY_REFRESH_MS,
    GESTURE_INTERVAL_MS, LOCKOUT_SETTLE_MS, MAX_FAILED_ATTEMPTS, MOTION_COOLDOWN_MS,
    UNLOCK_DURATION_MS,
};
use drawerlock_core::{Error, Result, SecretCode};
use serde::{Deserialize, Serialize};

/// Runtime parameters of the access controller.
///
/// Build one with [`ControllerConfig::builder`], [`ControllerConfig::from_json_str`]
/// or [`ControllerConfig::from_json_file`]; all three validate the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Code that unlocks the drawer.
    pub secret: SecretCode,

    /// Minimum spacing between two accepted motion detections.
    pub motion_cooldown_ms: u64,

    /// Code entry window before returning to idle without penalty.
    pub code_entry_timeout_ms: u64,

    /// Time the drawer stays unlocked before relocking itself.
    pub unlock_duration_ms: u64,

    /// Minimum spacing between two accepted direction symbols.
    pub gesture_interval_ms: u64,

    /// Minimum spacing between two accepted confirm presses.
    pub confirm_debounce_ms: u64,

    /// Delay before the confirm level is re-read after an edge.
    pub confirm_settle_ms: u64,

    /// Lockout hold time after the alarm pattern finished.
    pub lockout_settle_ms: u64,

    /// Cadence of clock and countdown screen refreshes.
    pub display_refresh_ms: u64,

    /// Consecutive failures that trigger the alarm lockout.
    pub max_failed_attempts: u8,

    pub axis_low_threshold: u16,

    pub axis_center: u16,

    pub axis_high_threshold: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            secret: SecretCode::default(),
            motion_cooldown_ms: MOTION_COOLDOWN_MS,
            code_entry_timeout_ms: CODE_ENTRY_TIMEOUT_MS,
            unlock_duration_ms: UNLOCK_DURATION_MS,
            gesture_interval_ms: GESTURE_INTERVAL_MS,
            confirm_debounce_ms: CONFIRM_DEBOUNCE_MS,
            confirm_settle_ms: CONFIRM_SETTLE_MS,
            lockout_settle_ms: LOCKOUT_SETTLE_MS,
            display_refresh_ms: DISPLAY_REFRESH_MS,
            max_failed_attempts: MAX_FAILED_ATTEMPTS,
            axis_low_threshold: AXIS_LOW_THRESHOLD,
            axis_center: AXIS_CENTER,
            axis_high_threshold: AXIS_HIGH_THRESHOLD,
        }
    }
}

impl ControllerConfig {
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed JSON or an invalid secret, and
    /// `Error::Config` when a value fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if !(self.axis_low_threshold < self.axis_center
            && self.axis_center < self.axis_high_threshold)
        {
            return Err(Error::Config(format!(
                "axis thresholds must satisfy low < center < high, got {} < {} < {}",
                self.axis_low_threshold, self.axis_center, self.axis_high_threshold
            )));
        }
        if self.axis_high_threshold > AXIS_MAX {
            return Err(Error::Config(format!(
                "axis_high_threshold must not exceed {AXIS_MAX}, got {}",
                self.axis_high_threshold
            )));
        }
        if self.max_failed_attempts == 0 {
            return Err(Error::Config(
                "max_failed_attempts must be at least 1".to_string(),
            ));
        }

        let windows = [
            ("code_entry_timeout_ms", self.code_entry_timeout_ms),
            ("unlock_duration_ms", self.unlock_duration_ms),
            ("display_refresh_ms", self.display_refresh_ms),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(Error::Config(format!("{name} must be greater than zero")));
        }

        Ok(())
    }
}

/// Builder for [`ControllerConfig`], starting from the defaults.
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    pub fn secret(mut self, secret: SecretCode) -> Self {
        self.config.secret = secret;
        self
    }

    pub fn motion_cooldown_ms(mut self, ms: u64) -> Self {
        self.config.motion_cooldown_ms = ms;
        self
    }

    pub fn code_entry_timeout_ms(mut self, ms: u64) -> Self {
        self.config.code_entry_timeout_ms = ms;
        self
    }

    pub fn unlock_duration_ms(mut self, ms: u64) -> Self {
        self.config.unlock_duration_ms = ms;
        self
    }

    pub fn gesture_interval_ms(mut self, ms: u64) -> Self {
        self.config.gesture_interval_ms = ms;
        self
    }

    pub fn confirm_debounce_ms(mut self, ms: u64) -> Self {
        self.config.confirm_debounce_ms = ms;
        self
    }

    pub fn confirm_settle_ms(mut self, ms: u64) -> Self {
        self.config.confirm_settle_ms = ms;
        self
    }

    pub fn lockout_settle_ms(mut self, ms: u64) -> Self {
        self.config.lockout_settle_ms = ms;
        self
    }

    pub fn display_refresh_ms(mut self, ms: u64) -> Self {
        self.config.display_refresh_ms = ms;
        self
    }

    pub fn max_failed_attempts(mut self, attempts: u8) -> Self {
        self.config.max_failed_attempts = attempts;
        self
    }

    pub fn axis_thresholds(mut self, low: u16, center: u16, high: u16) -> Self {
        self.config.axis_low_threshold = low;
        self.config.axis_center = center;
        self.config.axis_high_threshold = high;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` as [`ControllerConfig::validate`].
    pub fn build(self) -> Result<ControllerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.secret, SecretCode::parse("UUDDLR").unwrap());
        assert_eq!(config.max_failed_attempts, 3);
        assert_eq!(config.motion_cooldown_ms, 2000);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = ControllerConfig::from_json_str(r#"{ "lockout_settle_ms": 1000 }"#).unwrap();
        assert_eq!(config.lockout_settle_ms, 1000);
        assert_eq!(config.gesture_interval_ms, 300);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ControllerConfig::builder()
            .secret(SecretCode::parse("RRLLUD").unwrap())
            .unlock_duration_ms(4000)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"secret\":\"RRLLUD\""));
        assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
    }

    #[rstest]
    #[case(r#"{ "secret": "UUD" }"#)]
    #[case(r#"{ "secret": "UUDDLX" }"#)]
    #[case(r#"{ "unlock_duration_ms": "ten" }"#)]
    #[case("not json")]
    fn test_malformed_json_rejected(#[case] json: &str) {
        assert!(matches!(
            ControllerConfig::from_json_str(json),
            Err(Error::Json(_))
        ));
    }

    #[rstest]
    #[case(600, 512, 700)] // low above center
    #[case(300, 512, 512)] // high equal to center
    #[case(300, 512, 2000)] // high above sampler range
    fn test_invalid_thresholds(#[case] low: u16, #[case] center: u16, #[case] high: u16) {
        let result = ControllerConfig::builder()
            .axis_thresholds(low, center, high)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_windows_rejected() {
        let err = ControllerConfig::builder()
            .unlock_duration_ms(0)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: unlock_duration_ms must be greater than zero"
        );

        assert!(ControllerConfig::builder()
            .max_failed_attempts(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "secret": "dduurl", "motion_cooldown_ms": 500 }}"#).unwrap();

        let config = ControllerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.secret, SecretCode::parse("DDUURL").unwrap());
        assert_eq!(config.motion_cooldown_ms, 500);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ControllerConfig::from_json_file("/nonexistent/drawerlock.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
