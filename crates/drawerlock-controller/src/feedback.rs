//! Audible feedback patterns.
//!
//! A pattern is a list of pulse durations played back to back with a short
//! silent gap between pulses. Playback blocks the polling loop for the whole
//! pattern, the longest being the alarm at roughly three seconds.

use drawerlock_core::constants::{
    TONE_ALARM, TONE_FAILURE, TONE_GAP_MS, TONE_KEYPRESS, TONE_REJECT, TONE_SUCCESS, TONE_WELCOME,
};
use drawerlock_hardware::{MonotonicClock, ToneOutput};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TonePattern {
    pub name: &'static str,
    pub pulses: &'static [u64],
}

impl TonePattern {
    /// Presence detected, code entry starts.
    pub const WELCOME: TonePattern = TonePattern::new("welcome", TONE_WELCOME);
    pub const SUCCESS: TonePattern = TonePattern::new("success", TONE_SUCCESS);
    pub const FAILURE: TonePattern = TonePattern::new("failure", TONE_FAILURE);
    pub const ALARM: TonePattern = TonePattern::new("alarm", TONE_ALARM);
    /// Symbol accepted into the buffer.
    pub const KEYPRESS: TonePattern = TonePattern::new("keypress", TONE_KEYPRESS);
    /// Input refused: buffer full, or confirm on an incomplete code.
    pub const REJECT: TonePattern = TonePattern::new("reject", TONE_REJECT);

    const fn new(name: &'static str, pulses: &'static [u64]) -> Self {
        Self { name, pulses }
    }

    /// Total blocking time of the pattern, gaps included.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let gaps = self.pulses.len().saturating_sub(1) as u64;
        self.pulses.iter().sum::<u64>() + gaps * TONE_GAP_MS
    }

    /// Play the pattern, blocking until the last pulse ends.
    ///
    /// A failing buzzer is logged once and the rest of the pattern skipped.
    pub fn play(&self, tone: &mut dyn ToneOutput, clock: &mut dyn MonotonicClock) {
        for (i, &pulse) in self.pulses.iter().enumerate() {
            if i > 0 {
                clock.delay_ms(TONE_GAP_MS);
            }
            if let Err(err) = tone.emit(pulse) {
                warn!(pattern = self.name, error = %err, "tone output failed");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerlock_hardware::mock::{MockClock, MockTone};
    use rstest::rstest;

    #[rstest]
    #[case(TonePattern::WELCOME, 900)]
    #[case(TonePattern::SUCCESS, 1100)]
    #[case(TonePattern::FAILURE, 1400)]
    #[case(TonePattern::ALARM, 2900)]
    #[case(TonePattern::KEYPRESS, 80)]
    #[case(TonePattern::REJECT, 200)]
    fn test_pattern_duration(#[case] pattern: TonePattern, #[case] expected_ms: u64) {
        assert_eq!(pattern.duration_ms(), expected_ms);
    }

    #[test]
    fn test_play_emits_pulses_and_gaps() {
        let (mut clock, clock_handle) = MockClock::new();
        let (mut tone, tone_handle) = MockTone::with_clock(clock_handle.clone());

        TonePattern::WELCOME.play(&mut tone, &mut clock);

        assert_eq!(tone_handle.pulses(), vec![200, 100, 400]);
        assert_eq!(clock_handle.now_ms(), TonePattern::WELCOME.duration_ms());
    }
}
