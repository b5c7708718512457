//! Error types for the Drive client.

use thiserror::Error;

/// Result type for Drive operations.
pub type DriveResult<T> = Result<T, DriveError>;

/// Errors that can occur while talking to Google Drive.
#[derive(Debug, Error)]
pub enum DriveError {
    /// The service-account key could not be read or turned into an authenticator.
    #[error("{0}")]
    Credentials(String),

    /// Obtaining an access token failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// Drive answered with a non-success status.
    #[error("HTTP {status} - {message}")]
    Status { status: u16, message: String },
}

impl DriveError {
    /// Whether this error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for DriveError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
