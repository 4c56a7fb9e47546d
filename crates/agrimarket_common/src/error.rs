use std::fmt;
use thiserror::Error;

/// The base error type shared by the agrimarket crates.
///
/// Covers failures that happen on this side of the wire. Backend failures
/// travel as envelopes and never become an `AgriError`.
#[derive(Error, Debug)]
pub enum AgriError {
    /// Error occurred while building the HTTP client or a request part
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Error occurred while encoding or parsing JSON
    #[error("Failed to parse data: {0}")]
    Parse(String),

    /// Error occurred while reading or writing local storage
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for AgriError {
    fn from(err: reqwest::Error) -> Self {
        AgriError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for AgriError {
    fn from(err: serde_json::Error) -> Self {
        AgriError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AgriError {
    fn from(err: std::io::Error) -> Self {
        AgriError::Storage(err.to_string())
    }
}

pub fn storage_error<T: fmt::Display>(message: T) -> AgriError {
    AgriError::Storage(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_storage_errors() {
        let err = AgriError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"));
        assert!(matches!(err, AgriError::Storage(_)));
        assert_eq!(err.to_string(), "Storage error: read-only");
    }

    #[test]
    fn json_failures_are_parse_errors() {
        let err = AgriError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(matches!(err, AgriError::Parse(_)));
    }
}
