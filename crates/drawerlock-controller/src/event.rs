//! Security events written to the audit log.
//!
//! Each security-relevant transition produces exactly one [`AccessEvent`].
//! Its `Display` form is the text handed to the log sink.

use std::fmt;

use drawerlock_core::CodeBuffer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessEvent {
    /// Presence accepted, code entry started.
    MotionDetected,
    /// Code entry window elapsed without a submission.
    CodeEntryTimeout,
    AccessGranted,
    /// Wrong code; `attempt` counts consecutive failures so far.
    AccessDenied {
        entered: CodeBuffer,
        attempt: u8,
        max_attempts: u8,
    },
    /// Wrong code on the last allowed attempt.
    Lockout {
        entered: CodeBuffer,
        attempts: u8,
    },
    LockoutCleared,
    AutoRelock,
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessEvent::MotionDetected => write!(f, "MOTION DETECTED"),
            AccessEvent::CodeEntryTimeout => write!(f, "CODE ENTRY TIMEOUT"),
            AccessEvent::AccessGranted => write!(f, "ACCESS GRANTED"),
            AccessEvent::AccessDenied {
                entered,
                attempt,
                max_attempts,
            } => write!(f, "ACCESS DENIED code={entered} attempt={attempt}/{max_attempts}"),
            AccessEvent::Lockout { entered, attempts } => {
                write!(f, "ALARM LOCKOUT code={entered} attempts={attempts}")
            }
            AccessEvent::LockoutCleared => write!(f, "LOCKOUT CLEARED"),
            AccessEvent::AutoRelock => write!(f, "AUTO RELOCK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerlock_core::Direction;

    #[test]
    fn test_denied_message_carries_entered_code() {
        let entered: CodeBuffer = "UUDDLL"
            .chars()
            .map(|c| Direction::from_symbol(c).unwrap())
            .collect();
        let event = AccessEvent::AccessDenied {
            entered,
            attempt: 1,
            max_attempts: 3,
        };
        assert_eq!(event.to_string(), "ACCESS DENIED code=UUDDLL attempt=1/3");
    }

    #[test]
    fn test_simple_messages() {
        assert_eq!(AccessEvent::MotionDetected.to_string(), "MOTION DETECTED");
        assert_eq!(AccessEvent::AutoRelock.to_string(), "AUTO RELOCK");
    }
}
