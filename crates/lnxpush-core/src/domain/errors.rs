//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! validation failures, account resolution failures, and the per-attempt
//! error taxonomy of the sync orchestrator.

use thiserror::Error;

/// Errors that can occur in domain validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid folder id (empty or malformed)
    #[error("Invalid folder id: {0}")]
    InvalidFolderId(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors that can occur while resolving the sync account
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Account enumeration capability is not granted; terminal, never retried
    #[error("No permission to enumerate accounts")]
    PermissionDenied,

    /// No account of the required kind is installed
    #[error("No sync-capable account found")]
    NoAccountFound,

    /// More than one account matched and the policy requires exactly one
    #[error("{0} accounts match but policy requires exactly one")]
    MultipleAccounts(usize),

    /// The account directory itself failed
    #[error("Account lookup failed: {0}")]
    Lookup(String),
}

/// Terminal outcomes of a single sync attempt
///
/// Every entry point into the orchestrator is a callback, so these errors
/// never propagate to a caller; they are logged and the attempt ends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Account resolution failed
    #[error(transparent)]
    Account(#[from] AccountError),

    /// A required target parameter is still empty after store fallback
    #[error("Missing sync parameter: {field}")]
    MissingParameters {
        /// Which required field was empty
        field: &'static str,
    },

    /// The connection failed with no resolution available
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// Adapter-reported failure description
        reason: String,
    },

    /// The connection was suspended; the scheduler will re-trigger
    #[error("Connection suspended (code {code})")]
    ConnectionSuspended {
        /// Adapter-specific suspension code
        code: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AccountError::PermissionDenied.to_string(),
            "No permission to enumerate accounts"
        );
        assert_eq!(
            AccountError::MultipleAccounts(3).to_string(),
            "3 accounts match but policy requires exactly one"
        );
        assert_eq!(
            AttemptError::MissingParameters { field: "file_title" }.to_string(),
            "Missing sync parameter: file_title"
        );
    }

    #[test]
    fn test_account_error_converts_to_attempt_error() {
        let err: AttemptError = AccountError::NoAccountFound.into();
        assert_eq!(err.to_string(), "No sync-capable account found");
    }

    #[test]
    fn test_error_equality() {
        let a = AttemptError::ConnectionSuspended { code: 2 };
        let b = AttemptError::ConnectionSuspended { code: 2 };
        assert_eq!(a, b);
    }
}
