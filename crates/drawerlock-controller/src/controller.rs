//! Drawer access state machine.
//!
//! [`AccessController`] owns the [`Board`] and drives it through one polling
//! iteration per call to [`AccessController::poll`]:
//!
//! 1. Read the monotonic clock once.
//! 2. Refresh the display if the refresh cadence elapsed.
//! 3. Dispatch to the handler of the current state. Each handler samples only
//!    the inputs that matter in that state.
//! 4. Check the auto-relock deadline.
//!
//! # States
//!
//! - `Idle`: waiting for presence.
//! - `CollectingCode`: recording stick gestures until confirm or timeout.
//! - `Verifying`: comparing the submitted code, one iteration after confirm.
//! - `Unlocked`: drawer open until the relock deadline.
//! - `AlarmLockout`: input ignored until the lockout settles.
//!
//! # Valid Transitions
//!
//! - Idle → CollectingCode → Verifying → Unlocked → Idle
//! - CollectingCode → Idle (entry timeout)
//! - Verifying → CollectingCode (wrong code, attempts left)
//! - Verifying → AlarmLockout → Idle
//!
//! Code entry and unlock windows run from the transition, so blocking entry
//! tones count against them. The lockout settle runs from the end of the
//! alarm pattern.
//!
//! # Examples
//!
//! ```
//! use drawerlock_controller::{AccessController, ControllerConfig};
//! use drawerlock_core::SystemState;
//! use drawerlock_hardware::Board;
//! use drawerlock_hardware::mock::{
//!     MemoryLogSink, MockClock, MockDirectionalInput, MockDisplay, MockLock, MockMotionSensor,
//!     MockTone,
//! };
//!
//! let (clock, _clock_handle) = MockClock::new();
//! let (motion, motion_handle) = MockMotionSensor::new();
//! let (stick, _stick_handle) = MockDirectionalInput::new();
//! let (tone, _tone_handle) = MockTone::new();
//! let (lock, lock_handle) = MockLock::new();
//! let (display, _display_handle) = MockDisplay::new();
//! let (log, log_handle) = MemoryLogSink::new();
//!
//! let board = Board::builder()
//!     .clock(clock)
//!     .motion(motion)
//!     .input(stick)
//!     .tone(tone)
//!     .lock(lock)
//!     .display(display)
//!     .log(log)
//!     .build()
//!     .unwrap();
//!
//! let mut controller = AccessController::new(ControllerConfig::default(), board);
//! assert_eq!(lock_handle.position(), Some(true));
//!
//! motion_handle.set_present(true);
//! let transition = controller.poll().unwrap();
//! assert_eq!(transition.to, SystemState::CollectingCode);
//! assert_eq!(log_handle.count_containing("MOTION DETECTED"), 1);
//! ```

use std::collections::VecDeque;

use drawerlock_core::{CodeBuffer, Error, Result, SystemState, TimeOfDay};
use drawerlock_hardware::Board;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::ControllerConfig;
use crate::display::{Screen, ScreenView, remaining_seconds};
use crate::event::AccessEvent;
use crate::feedback::TonePattern;
use crate::history::{StateTransition, TransitionHistory};
use crate::input::InputSampler;

/// Counters of what the controller has seen since start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStats {
    /// Accepted presence detections that started a code entry.
    pub motion_triggers: u64,
    pub unlocks: u64,
    /// Wrong submissions, including the one that triggers a lockout.
    pub denials: u64,
    pub lockouts: u64,
    /// Code entries abandoned by timeout.
    pub timeouts: u64,
    /// Gestures on a full buffer and confirms on an incomplete one.
    pub rejected_inputs: u64,
}

/// The drawer access controller.
///
/// Owns every peripheral through the [`Board`]; nothing else mutates it.
pub struct AccessController {
    config: ControllerConfig,
    board: Board,
    sampler: InputSampler,
    state: SystemState,
    buffer: CodeBuffer,
    failed_attempts: u8,
    calendar_available: bool,

    code_entry_deadline_ms: u64,
    relock_deadline_ms: Option<u64>,
    lockout_deadline_ms: u64,
    next_refresh_ms: u64,

    history: TransitionHistory,
    stats: ControllerStats,
}

impl AccessController {
    /// Take ownership of the board, engage the lock and show the idle screen.
    ///
    /// `config` is expected to be validated already (see
    /// [`ControllerConfig::validate`]).
    pub fn new(config: ControllerConfig, board: Board) -> Self {
        let calendar_available = board.calendar.is_available();
        if !calendar_available {
            warn!("real-time clock unavailable, audit records carry no timestamp");
        }

        let mut controller = Self {
            sampler: InputSampler::new(&config),
            config,
            board,
            state: SystemState::Idle,
            buffer: CodeBuffer::new(),
            failed_attempts: 0,
            calendar_available,
            code_entry_deadline_ms: 0,
            relock_deadline_ms: None,
            lockout_deadline_ms: 0,
            next_refresh_ms: 0,
            history: TransitionHistory::new(),
            stats: ControllerStats::default(),
        };

        controller.command_lock(true);
        controller.render();
        info!(state = %controller.state, "access controller started");
        controller
    }

    /// Run one polling iteration.
    ///
    /// Returns the transition performed during this iteration, if any.
    pub fn poll(&mut self) -> Option<StateTransition> {
        let now = self.board.clock.now_ms();

        if self.state != SystemState::Verifying && now >= self.next_refresh_ms {
            self.render();
        }

        let dispatched = match self.state {
            SystemState::Idle => self.handle_idle(now),
            SystemState::CollectingCode => self.handle_collecting(now),
            SystemState::Verifying => self.handle_verifying(now),
            SystemState::Unlocked => None,
            SystemState::AlarmLockout => self.handle_lockout(now),
        };

        let relocked = self.check_relock(now);
        relocked.or(dispatched)
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Consecutive wrong submissions since the last unlock or lockout.
    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }

    pub fn code_buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        self.history.entries()
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history.last(count)
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn handle_idle(&mut self, now: u64) -> Option<StateTransition> {
        if !self.sampler.motion(now, self.board.motion.as_mut()) {
            return None;
        }
        self.stats.motion_triggers += 1;
        self.audit(&AccessEvent::MotionDetected);
        self.enter(SystemState::CollectingCode, now)
    }

    fn handle_collecting(&mut self, now: u64) -> Option<StateTransition> {
        if now >= self.code_entry_deadline_ms {
            self.stats.timeouts += 1;
            self.audit(&AccessEvent::CodeEntryTimeout);
            return self.enter(SystemState::Idle, now);
        }

        if let Some(direction) = self.sampler.gesture(now, self.board.input.as_mut()) {
            if self.buffer.push(direction) {
                self.play(TonePattern::KEYPRESS);
                self.render();
            } else {
                debug!(%direction, "code buffer full, gesture rejected");
                self.reject();
            }
        }

        let confirmed = self.sampler.confirm(
            now,
            self.board.input.as_mut(),
            self.board.clock.as_mut(),
        );
        if !confirmed {
            return None;
        }
        if !self.buffer.is_full() {
            debug!(entered = self.buffer.len(), "confirm on incomplete code rejected");
            self.reject();
            return None;
        }
        self.enter(SystemState::Verifying, now)
    }

    fn handle_verifying(&mut self, now: u64) -> Option<StateTransition> {
        if self.config.secret.matches(&self.buffer) {
            self.failed_attempts = 0;
            self.stats.unlocks += 1;
            self.audit(&AccessEvent::AccessGranted);
            return self.enter(SystemState::Unlocked, now);
        }

        let entered = self.buffer.clone();
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.stats.denials += 1;

        if self.failed_attempts >= self.config.max_failed_attempts {
            self.stats.lockouts += 1;
            self.audit(&AccessEvent::Lockout {
                entered,
                attempts: self.failed_attempts,
            });
            return self.enter(SystemState::AlarmLockout, now);
        }

        self.play(TonePattern::FAILURE);
        self.audit(&AccessEvent::AccessDenied {
            entered,
            attempt: self.failed_attempts,
            max_attempts: self.config.max_failed_attempts,
        });
        self.enter(SystemState::CollectingCode, now)
    }

    fn handle_lockout(&mut self, now: u64) -> Option<StateTransition> {
        if now < self.lockout_deadline_ms {
            return None;
        }
        self.failed_attempts = 0;
        self.audit(&AccessEvent::LockoutCleared);
        self.enter(SystemState::Idle, now)
    }

    fn check_relock(&mut self, now: u64) -> Option<StateTransition> {
        let deadline = self.relock_deadline_ms?;
        if self.state != SystemState::Unlocked || now < deadline {
            return None;
        }
        self.audit(&AccessEvent::AutoRelock);
        self.enter(SystemState::Idle, now)
    }

    /// Transition and run the entry actions of the new state.
    fn enter(&mut self, to: SystemState, now: u64) -> Option<StateTransition> {
        let transition = match self.transition_to(to, now) {
            Ok(transition) => transition,
            Err(err) => {
                error!(error = %err, "state transition refused");
                return None;
            }
        };

        if transition.from == SystemState::Verifying {
            self.buffer.clear();
        }

        match to {
            SystemState::Idle => {
                self.buffer.clear();
                self.relock_deadline_ms = None;
                if !transition.from.lock_engaged() {
                    self.command_lock(true);
                }
            }
            SystemState::CollectingCode => {
                self.buffer.clear();
                self.sampler.reset_gestures();
                self.code_entry_deadline_ms = now + self.config.code_entry_timeout_ms;
                if transition.from == SystemState::Idle {
                    self.play(TonePattern::WELCOME);
                }
            }
            SystemState::Verifying => {}
            SystemState::Unlocked => {
                self.command_lock(false);
                self.relock_deadline_ms = Some(now + self.config.unlock_duration_ms);
                self.play(TonePattern::SUCCESS);
            }
            SystemState::AlarmLockout => {
                self.play(TonePattern::ALARM);
                // Settles from the end of the alarm, not from the transition.
                self.lockout_deadline_ms =
                    self.board.clock.now_ms() + self.config.lockout_settle_ms;
            }
        }

        self.render();
        Some(transition)
    }

    /// Validate and record a state change.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the transition is not allowed.
    fn transition_to(&mut self, to: SystemState, now: u64) -> Result<StateTransition> {
        let from = self.state;
        if !from.can_transition_to(&to) {
            return Err(Error::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        info!(%from, %to, failed_attempts = self.failed_attempts, "state transition");
        self.state = to;
        let transition = StateTransition::new(from, to, now);
        self.history.push(transition);
        Ok(transition)
    }

    fn reject(&mut self) {
        self.stats.rejected_inputs += 1;
        self.play(TonePattern::REJECT);
    }

    fn play(&mut self, pattern: TonePattern) {
        pattern.play(self.board.tone.as_mut(), self.board.clock.as_mut());
    }

    fn command_lock(&mut self, locked: bool) {
        if let Err(err) = self.board.lock.set_position(locked) {
            warn!(locked, error = %err, "lock actuator command failed");
        }
    }

    fn timestamp(&mut self) -> Option<TimeOfDay> {
        if !self.calendar_available {
            return None;
        }
        match self.board.calendar.now() {
            Ok(time) => Some(time),
            Err(err) => {
                warn!(error = %err, "real-time clock read failed, dropping timestamps");
                self.calendar_available = false;
                None
            }
        }
    }

    fn audit(&mut self, event: &AccessEvent) {
        let timestamp = self.timestamp();
        self.board.log.record(&event.to_string(), timestamp);
    }

    /// Draw the screen for the current state and restart the refresh cadence.
    fn render(&mut self) {
        let now = self.board.clock.now_ms();
        let view = match self.state {
            SystemState::Idle => ScreenView::Idle {
                time: self.timestamp(),
            },
            SystemState::CollectingCode => ScreenView::Prompt {
                masked: self.buffer.masked(),
                remaining_s: remaining_seconds(now, self.code_entry_deadline_ms),
            },
            SystemState::Verifying => ScreenView::Verifying {
                masked: self.buffer.masked(),
            },
            SystemState::Unlocked => ScreenView::Unlocked {
                remaining_s: self
                    .relock_deadline_ms
                    .map_or(0, |deadline| remaining_seconds(now, deadline)),
            },
            SystemState::AlarmLockout => ScreenView::Lockout {
                remaining_s: remaining_seconds(now, self.lockout_deadline_ms),
            },
        };

        let screen = Screen::from_view(&view);
        if let Err(err) = self.board.display.render(screen.lines()) {
            warn!(error = %err, "display render failed");
        }
        self.next_refresh_ms = now + self.config.display_refresh_ms;
    }
}
