//! Error types for signal-sender.

use thiserror::Error;

/// Errors that can occur when sending through the Signal gateway.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The request never produced a response (connect failure, timeout).
    #[error("Signal API request failed")]
    Unavailable(#[source] reqwest::Error),

    /// The gateway answered with something other than 201 Created.
    #[error("Signal API returned HTTP {0}")]
    Status(u16),

    /// The HTTP client could not be built.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SignalError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SignalError::Status(code) => Some(*code),
            _ => None,
        }
    }
}
