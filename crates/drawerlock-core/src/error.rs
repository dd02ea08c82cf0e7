use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Code errors
    #[error("Invalid direction symbol: {0:?}")]
    InvalidDirection(char),

    #[error("Invalid secret code: {reason}")]
    InvalidSecret { reason: String },

    #[error("Invalid time of day: {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u8, minute: u8, second: u8 },

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Display errors
    #[error("Invalid display line {line}, max is {max}")]
    InvalidLine { line: usize, max: usize },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
