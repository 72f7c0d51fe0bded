//! Error types for the message relay.

use serde_json::{json, Value};
use thiserror::Error;

/// Main error type for relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A pushed payload failed required-field validation.
    ///
    /// The relay is left untouched when this is returned: nothing is
    /// stored and no resume pass runs.
    #[error("malformed message: missing or invalid fields: {}", missing_fields.join(", "))]
    MalformedMessage { missing_fields: Vec<String> },
}

impl RelayError {
    /// Structured body for the transport boundary to return verbatim.
    pub fn wire_body(&self) -> Value {
        match self {
            RelayError::MalformedMessage { missing_fields } => json!({
                "error": "malformed_message",
                "missing_fields": missing_fields,
            }),
        }
    }
}

/// Outcome of waiting on a delivery handle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitError {
    /// The configured delivery window elapsed with no message.
    #[error("timed out waiting for delivery")]
    Timeout,

    /// The relay was dropped while the waiter was still pending.
    #[error("relay closed before delivery")]
    Closed,
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
