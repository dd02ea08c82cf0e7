//! Bounded record of state transitions.

use std::collections::VecDeque;

use drawerlock_core::SystemState;
use drawerlock_core::constants::MAX_HISTORY_SIZE;
use serde::{Deserialize, Serialize};

/// Represents a single state transition with its monotonic timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SystemState,

    /// The state transitioned to.
    pub to: SystemState,

    /// Monotonic clock reading when the transition happened.
    pub at_ms: u64,
}

impl StateTransition {
    pub fn new(from: SystemState, to: SystemState, at_ms: u64) -> Self {
        Self { from, to, at_ms }
    }
}

/// Most recent transitions, oldest first, capped at [`MAX_HISTORY_SIZE`].
#[derive(Debug, Clone)]
pub struct TransitionHistory {
    entries: VecDeque<StateTransition>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn push(&mut self, transition: StateTransition) {
        self.entries.push_back(transition);
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> &VecDeque<StateTransition> {
        &self.entries
    }

    /// The last `count` transitions, oldest first.
    pub fn last(&self, count: usize) -> Vec<StateTransition> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut history = TransitionHistory::new();
        for i in 0..(MAX_HISTORY_SIZE as u64 + 10) {
            history.push(StateTransition::new(
                SystemState::Idle,
                SystemState::CollectingCode,
                i,
            ));
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        assert_eq!(history.entries().front().unwrap().at_ms, 10);
    }

    #[test]
    fn test_last_returns_most_recent_in_order() {
        let mut history = TransitionHistory::new();
        history.push(StateTransition::new(SystemState::Idle, SystemState::CollectingCode, 1));
        history.push(StateTransition::new(SystemState::CollectingCode, SystemState::Verifying, 2));
        history.push(StateTransition::new(SystemState::Verifying, SystemState::Unlocked, 3));

        let last_two = history.last(2);
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].from, SystemState::CollectingCode);
        assert_eq!(last_two[1].to, SystemState::Unlocked);

        assert_eq!(history.last(10).len(), 3);
    }
}
