//! Drive API error types

use thiserror::Error;

/// Errors produced by the drive HTTP client
///
/// Status and transport failures are kept apart because the connection
/// adapter classifies them differently: auth statuses become recoverable
/// failures, server errors become suspensions, transport errors are fatal
/// for the attempt.
#[derive(Debug, Error)]
pub enum DriveApiError {
    /// The API answered with a non-success status
    #[error("Drive API returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("Drive API transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Drive API returned an unexpected body: {0}")]
    Decode(String),
}

impl DriveApiError {
    /// Returns the HTTP status code, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            DriveApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for 401/403 answers that a re-authorization can fix
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true for 5xx answers
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if (500..600).contains(&s))
    }
}

impl From<reqwest::Error> for DriveApiError {
    fn from(e: reqwest::Error) -> Self {
        DriveApiError::Transport(e.to_string())
    }
}
