//! Analog stick to direction symbol conversion.
//!
//! The stick rests near the center of the sampler range. A reading counts as
//! a deflection only once it leaves the band between the low and high
//! thresholds, so jitter around the center never produces a symbol. At most
//! one symbol comes out of a sample: the vertical axis is checked first and
//! wins when both axes are deflected.

use drawerlock_core::Direction;
use tracing::trace;

/// Turns stick readings into direction symbols with a minimum spacing.
///
/// # Examples
///
/// ```
/// use drawerlock_controller::GestureEncoder;
/// use drawerlock_core::Direction;
///
/// let mut encoder = GestureEncoder::new(300, 700, 300);
///
/// assert_eq!(encoder.sample(0, 512, 100), Some(Direction::Up));
/// // Still inside the spacing window.
/// assert_eq!(encoder.sample(200, 512, 900), None);
/// assert_eq!(encoder.sample(300, 512, 900), Some(Direction::Down));
/// ```
#[derive(Debug, Clone)]
pub struct GestureEncoder {
    low: u16,
    high: u16,
    min_interval_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl GestureEncoder {
    /// Create an encoder. `low` and `high` must straddle the stick center.
    pub fn new(low: u16, high: u16, min_interval_ms: u64) -> Self {
        debug_assert!(low < high, "low threshold must be below high threshold");
        Self {
            low,
            high,
            min_interval_ms,
            last_accepted_ms: None,
        }
    }

    /// Classify a single reading without any spacing policy.
    ///
    /// Vertical below low is Up, vertical above high is Down; only when the
    /// vertical axis is at rest does the horizontal axis give Left or Right.
    #[must_use]
    pub fn classify(&self, horizontal: u16, vertical: u16) -> Option<Direction> {
        if vertical < self.low {
            Some(Direction::Up)
        } else if vertical > self.high {
            Some(Direction::Down)
        } else if horizontal < self.low {
            Some(Direction::Left)
        } else if horizontal > self.high {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Classify a reading taken at `now_ms`, honouring the minimum spacing
    /// since the last accepted symbol.
    pub fn sample(&mut self, now_ms: u64, horizontal: u16, vertical: u16) -> Option<Direction> {
        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.min_interval_ms
        {
            return None;
        }

        let direction = self.classify(horizontal, vertical)?;
        trace!(%direction, horizontal, vertical, "gesture accepted");
        self.last_accepted_ms = Some(now_ms);
        Some(direction)
    }

    /// Forget the last accepted symbol so the next deflection is accepted
    /// immediately.
    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn encoder() -> GestureEncoder {
        GestureEncoder::new(300, 700, 300)
    }

    #[rstest]
    #[case(512, 512, None)]
    #[case(512, 299, Some(Direction::Up))]
    #[case(512, 300, None)] // on the threshold is not past it
    #[case(512, 701, Some(Direction::Down))]
    #[case(512, 700, None)]
    #[case(10, 512, Some(Direction::Left))]
    #[case(1023, 512, Some(Direction::Right))]
    #[case(10, 10, Some(Direction::Up))] // vertical wins
    #[case(1023, 1023, Some(Direction::Down))]
    #[case(1023, 10, Some(Direction::Up))]
    fn test_classify(
        #[case] horizontal: u16,
        #[case] vertical: u16,
        #[case] expected: Option<Direction>,
    ) {
        assert_eq!(encoder().classify(horizontal, vertical), expected);
    }

    #[test]
    fn test_second_gesture_within_interval_is_dropped() {
        let mut enc = encoder();
        assert_eq!(enc.sample(1000, 10, 512), Some(Direction::Left));
        assert_eq!(enc.sample(1299, 1023, 512), None);
        assert_eq!(enc.sample(1300, 1023, 512), Some(Direction::Right));
    }

    #[test]
    fn test_neutral_sample_does_not_restart_window() {
        let mut enc = encoder();
        assert_eq!(enc.sample(0, 512, 10), Some(Direction::Up));
        assert_eq!(enc.sample(400, 512, 512), None);
        assert_eq!(enc.sample(401, 512, 10), Some(Direction::Up));
    }

    #[test]
    fn test_reset_clears_spacing() {
        let mut enc = encoder();
        assert!(enc.sample(0, 512, 10).is_some());
        enc.reset();
        assert_eq!(enc.sample(10, 512, 10), Some(Direction::Up));
    }
}
