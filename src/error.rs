//! Error types for the mailru_cloud library.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for cloud operations.
#[derive(Error, Debug)]
pub enum CloudError {
    /// Missing or empty input, detected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected HTTP status or unparseable response at a required step.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The session could not be authenticated.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network request error.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloudError {
    /// Protocol error for a response whose status was not `200 OK`.
    pub(crate) fn unexpected_status(status: StatusCode) -> Self {
        CloudError::Protocol(format!(
            "{}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
    }

    /// Check if this error was raised before touching the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, CloudError::Validation(_))
    }
}

/// Result type alias for cloud operations.
pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = CloudError::unexpected_status(StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Protocol error: 403: Forbidden");
    }

    #[test]
    fn test_is_validation() {
        assert!(CloudError::Validation("empty".into()).is_validation());
        assert!(!CloudError::Auth("token not retrieved".into()).is_validation());
    }
}
