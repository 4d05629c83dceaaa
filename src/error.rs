//! Error types for the One Earth API.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur while obtaining a measurement series.
///
/// Row-level anomalies in the upstream data never surface here; they are
/// skipped during parsing. Only whole-fetch failures do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network-level failure (DNS, connect, reset, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status code
    #[error("Upstream error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// All attempts failed; carries the last underlying cause
    #[error("Fetch failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<FetchError>,
    },

    /// The caller's cancellation signal fired
    #[error("Fetch cancelled")]
    Cancelled,

    /// The body could not be read as delimited text
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Every row was filtered out
    #[error("No valid data points found")]
    NoValidData,
}

impl FetchError {
    /// Whether the failure came from the caller rather than the upstream.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with FetchError
pub type FetchResult<T> = Result<T, FetchError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::NoValidData;
        assert_eq!(err.to_string(), "No valid data points found");

        let err = FetchError::Cancelled;
        assert_eq!(err.to_string(), "Fetch cancelled");

        let err = ConfigError::InvalidValue {
            var: "PORT".to_string(),
            reason: "Must be a number".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for PORT: Must be a number");
    }

    #[test]
    fn test_status_error_variant() {
        let err = FetchError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_retries_exhausted_wraps_cause() {
        let err = FetchError::RetriesExhausted {
            attempts: 5,
            last: Box::new(FetchError::Transport("Connection failed".to_string())),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempts"));
        assert!(msg.contains("Connection failed"));
        assert!(!err.is_cancelled());
        assert!(FetchError::Cancelled.is_cancelled());
    }
}
