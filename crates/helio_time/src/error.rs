//! Error types for time-scale conversions.

use thiserror::Error;

/// Errors from time parsing, leap-second kernel parsing, or kernel loading.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// LSK text parsing failed.
    #[error("LSK parse error: {0}")]
    LskParse(String),
    /// A date/time string or calendar field could not be interpreted.
    #[error("invalid date/time: {0}")]
    InvalidDate(String),
    /// I/O error while reading a kernel.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TimeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
