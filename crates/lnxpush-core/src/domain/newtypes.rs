//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Identifier for SyncAccount entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random AccountId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an AccountId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid UUID: {e}")))
    }
}

impl From<Uuid> for AccountId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier of a folder in the cloud drive
///
/// Always non-empty: an absent target folder is represented as an empty
/// string inside [`SyncParameters`](super::params::SyncParameters), and a
/// `FolderId` is only constructed once an upload target actually exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    /// Creates a FolderId, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidFolderId(
                "folder id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the folder id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque token produced by a failed connection attempt
///
/// A resolution flow can use the handle to remedy the failure (consent,
/// re-sign-in). The core never interprets its content; the producing
/// adapter knows what it encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolutionHandle(String);

impl ResolutionHandle {
    /// Wraps an adapter-specific resolution token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResolutionHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_roundtrip() {
        let id = AccountId::new();
        let parsed: AccountId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_account_id_rejects_garbage() {
        let result: Result<AccountId, _> = "not-a-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_folder_id_valid() {
        let folder = FolderId::new("0B7-abc123").unwrap();
        assert_eq!(folder.as_str(), "0B7-abc123");
    }

    #[test]
    fn test_folder_id_rejects_empty() {
        assert!(FolderId::new("").is_err());
        assert!(FolderId::new("   ").is_err());
    }

    #[test]
    fn test_resolution_handle_is_opaque() {
        let handle = ResolutionHandle::new("https://example.com/consent?state=xyz");
        assert_eq!(handle.as_str(), "https://example.com/consent?state=xyz");
        assert_eq!(handle.to_string(), handle.as_str());
    }

    #[test]
    fn test_serde_transparent() {
        let folder = FolderId::new("F1").unwrap();
        let json = serde_json::to_string(&folder).unwrap();
        assert_eq!(json, "\"F1\"");
    }
}
