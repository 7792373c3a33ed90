//! Error types for the signal gate
//!
//! These are *operational* errors: I/O, serialization, transport, telemetry
//! registration. Contract failures are not errors — the evaluator classifies
//! them into reason codes and always returns a well-formed ERROR response.

use thiserror::Error;

/// Main error type for gate operations outside the evaluation contract.
#[derive(Error, Debug)]
pub enum GateError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Request/response parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Telemetry setup or emission error
    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    /// Transport-layer error
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GateError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        GateError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        GateError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        GateError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GateError::InvalidInput(_) | GateError::FileError(_) | GateError::ParseError(_)
        )
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::ParseError(format!("JSON error: {}", err))
    }
}

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;
