//! Input sampling with cooldown and debounce policy.
//!
//! [`InputSampler`] is the only place that reads the input peripherals. Each
//! read goes through a policy object that decides whether the raw reading is
//! an event the state machine should see:
//!
//! - [`MotionGate`]: presence is accepted at most once per cooldown window.
//! - [`GestureEncoder`]: stick deflections become direction symbols with a
//!   minimum spacing.
//! - [`ConfirmButton`]: high→low edges, spaced by the debounce window and
//!   confirmed by a settle re-check.
//!
//! A failed peripheral read is logged and treated as "no input".

use drawerlock_core::Direction;
use drawerlock_hardware::{DirectionalInput, MonotonicClock, MotionSensor};
use tracing::{debug, trace, warn};

use crate::config::ControllerConfig;
use crate::gesture::GestureEncoder;

/// Cooldown gate for presence detections.
#[derive(Debug, Clone)]
pub struct MotionGate {
    cooldown_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl MotionGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_accepted_ms: None,
        }
    }

    /// Returns `true` if `present` should count as a new detection.
    ///
    /// The very first detection is always accepted.
    pub fn accept(&mut self, now_ms: u64, present: bool) -> bool {
        if !present {
            return false;
        }
        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.cooldown_ms
        {
            trace!(since_last_ms = now_ms - last, "motion inside cooldown");
            return false;
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

/// Edge detector and debouncer for the confirm control.
///
/// The line idles high; a press pulls it low. Only the high→low transition
/// is an event, so holding the control down confirms once.
#[derive(Debug, Clone)]
pub struct ConfirmButton {
    debounce_ms: u64,
    last_level: bool,
    last_accepted_ms: Option<u64>,
}

impl ConfirmButton {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_level: true,
            last_accepted_ms: None,
        }
    }

    /// Feed a raw level. Returns `true` when it is a falling edge outside the
    /// debounce window, i.e. a press candidate that still needs
    /// [`settle`](Self::settle).
    pub fn edge(&mut self, now_ms: u64, level: bool) -> bool {
        let falling = self.last_level && !level;
        self.last_level = level;
        if !falling {
            return false;
        }
        if let Some(last) = self.last_accepted_ms
            && now_ms.saturating_sub(last) < self.debounce_ms
        {
            trace!(since_last_ms = now_ms - last, "confirm edge inside debounce");
            return false;
        }
        true
    }

    /// Resolve a press candidate with the level re-read after the settle
    /// delay. A line that bounced back high rejects the press.
    pub fn settle(&mut self, now_ms: u64, level: bool) -> bool {
        self.last_level = level;
        if level {
            trace!("confirm edge rejected as contact bounce");
            return false;
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

/// Reads the input peripherals and applies the acceptance policy.
#[derive(Debug, Clone)]
pub struct InputSampler {
    motion: MotionGate,
    gestures: GestureEncoder,
    confirm: ConfirmButton,
    confirm_settle_ms: u64,
}

impl InputSampler {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            motion: MotionGate::new(config.motion_cooldown_ms),
            gestures: GestureEncoder::new(
                config.axis_low_threshold,
                config.axis_high_threshold,
                config.gesture_interval_ms,
            ),
            confirm: ConfirmButton::new(config.confirm_debounce_ms),
            confirm_settle_ms: config.confirm_settle_ms,
        }
    }

    /// Poll the presence sensor. Returns `true` for an accepted detection.
    pub fn motion(&mut self, now_ms: u64, sensor: &mut dyn MotionSensor) -> bool {
        let present = sensor.read().unwrap_or_else(|err| {
            warn!(error = %err, "motion sensor read failed");
            false
        });
        let accepted = self.motion.accept(now_ms, present);
        if accepted {
            debug!(now_ms, "motion accepted");
        }
        accepted
    }

    /// Poll the stick axes. Returns an accepted direction symbol, if any.
    pub fn gesture(&mut self, now_ms: u64, input: &mut dyn DirectionalInput) -> Option<Direction> {
        let (horizontal, vertical) = match input.read_axes() {
            Ok(axes) => axes,
            Err(err) => {
                warn!(error = %err, "stick axes read failed");
                return None;
            }
        };
        let direction = self.gestures.sample(now_ms, horizontal, vertical)?;
        debug!(%direction, now_ms, "gesture accepted");
        Some(direction)
    }

    /// Poll the confirm control. Returns `true` for an accepted press.
    ///
    /// On a press candidate this blocks for the settle delay and re-reads the
    /// line before deciding.
    pub fn confirm(
        &mut self,
        now_ms: u64,
        input: &mut dyn DirectionalInput,
        clock: &mut dyn MonotonicClock,
    ) -> bool {
        let Some(level) = read_confirm(input) else {
            return false;
        };
        if !self.confirm.edge(now_ms, level) {
            return false;
        }

        clock.delay_ms(self.confirm_settle_ms);
        let Some(settled) = read_confirm(input) else {
            return false;
        };
        let accepted = self.confirm.settle(now_ms, settled);
        if accepted {
            debug!(now_ms, "confirm accepted");
        }
        accepted
    }

    /// Restart gesture spacing, used when a new code entry begins.
    pub fn reset_gestures(&mut self) {
        self.gestures.reset();
    }
}

fn read_confirm(input: &mut dyn DirectionalInput) -> Option<bool> {
    input
        .read_confirm()
        .inspect_err(|err| warn!(error = %err, "confirm read failed"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerlock_hardware::mock::{MockClock, MockDirectionalInput, MockMotionSensor};

    #[test]
    fn test_motion_twice_within_cooldown_accepts_first_only() {
        let mut gate = MotionGate::new(2000);
        assert!(gate.accept(100, true));
        assert!(!gate.accept(1500, true));
        assert!(!gate.accept(2099, true));
        assert!(gate.accept(2100, true));
    }

    #[test]
    fn test_motion_absent_never_accepted() {
        let mut gate = MotionGate::new(2000);
        assert!(!gate.accept(0, false));
        assert!(gate.accept(1, true));
    }

    #[test]
    fn test_confirm_edge_only_on_falling_level() {
        let mut button = ConfirmButton::new(500);
        assert!(!button.edge(0, true));
        assert!(button.edge(10, false));
        assert!(button.settle(30, false));

        // Held down: no further edge.
        assert!(!button.edge(1000, false));
        assert!(!button.edge(1100, true));
        assert!(button.edge(1200, false));
    }

    #[test]
    fn test_confirm_debounce_window() {
        let mut button = ConfirmButton::new(500);
        assert!(button.edge(0, false));
        assert!(button.settle(0, false));
        button.edge(100, true);
        assert!(!button.edge(200, false));
        button.edge(300, true);
        assert!(button.edge(500, false));
    }

    #[test]
    fn test_confirm_bounce_rejected_by_settle() {
        let mut button = ConfirmButton::new(500);
        assert!(button.edge(0, false));
        assert!(!button.settle(20, true));
        // A bounce does not start the debounce window.
        assert!(button.edge(40, false));
    }

    #[test]
    fn test_sampler_confirm_reads_twice_and_delays() {
        let config = ControllerConfig::default();
        let mut sampler = InputSampler::new(&config);
        let (mut stick, handle) = MockDirectionalInput::new();
        let (mut clock, clock_handle) = MockClock::new();

        handle.press_confirm();
        assert!(sampler.confirm(0, &mut stick, &mut clock));
        assert_eq!(clock_handle.now_ms(), config.confirm_settle_ms);

        handle.release_confirm();
        assert!(!sampler.confirm(900, &mut stick, &mut clock));
        handle.queue_confirm_levels([false, true]);
        assert!(!sampler.confirm(1000, &mut stick, &mut clock));
    }

    #[test]
    fn test_sampler_treats_sensor_fault_as_absent() {
        let config = ControllerConfig::default();
        let mut sampler = InputSampler::new(&config);
        let (mut sensor, handle) = MockMotionSensor::new();

        handle.set_present(true);
        handle.fail_next_read();
        assert!(!sampler.motion(0, &mut sensor));
        assert!(sampler.motion(1, &mut sensor));
    }

    #[test]
    fn test_sampler_gesture_fault_yields_nothing() {
        let config = ControllerConfig::default();
        let mut sampler = InputSampler::new(&config);
        let (mut stick, handle) = MockDirectionalInput::new();

        handle.set_axes(512, 0);
        handle.fail_next_read();
        assert_eq!(sampler.gesture(0, &mut stick), None);
        assert_eq!(sampler.gesture(1, &mut stick), Some(Direction::Up));
    }
}
