//! Sync account domain entity
//!
//! This module defines the SyncAccount entity: the principal a sync run
//! operates under. Accounts are resolved fresh for every orchestration
//! attempt and never cached across attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::AccountId;

/// A sync-capable account registered with LNXPush
///
/// Carries the registration flags the sync service toggles:
/// `syncable` (may this account sync at all) and `auto_sync`
/// (is the periodic schedule enabled for it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAccount {
    /// Unique identifier for this account
    id: AccountId,
    /// Account name (typically the user's email address)
    name: String,
    /// Provider kind this account belongs to (e.g. `drive`)
    kind: String,
    /// Whether sync is enabled for this account
    syncable: bool,
    /// Whether the periodic schedule is enabled for this account
    auto_sync: bool,
    /// When this account was registered
    created_at: DateTime<Utc>,
}

impl SyncAccount {
    /// Creates a new account of the given kind
    ///
    /// New accounts start non-syncable with automatic sync disabled;
    /// `initialize_sync` flips both flags once registration completes.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            kind: kind.into(),
            syncable: false,
            auto_sync: false,
            created_at: Utc::now(),
        }
    }

    /// Reconstitutes an account from storage
    pub fn with_id(
        id: AccountId,
        name: impl Into<String>,
        kind: impl Into<String>,
        syncable: bool,
        auto_sync: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            syncable,
            auto_sync,
            created_at,
        }
    }

    /// Returns the account's unique identifier
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Returns the account name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the provider kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns whether this account may sync
    pub fn is_syncable(&self) -> bool {
        self.syncable
    }

    /// Returns whether the periodic schedule is enabled
    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    /// Returns when the account was registered
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the account syncable or not
    pub fn set_syncable(&mut self, syncable: bool) {
        self.syncable = syncable;
    }

    /// Enables or disables the periodic schedule for this account
    pub fn set_auto_sync(&mut self, enabled: bool) {
        self.auto_sync = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_unregistered() {
        let account = SyncAccount::new("user@example.com", "drive");
        assert_eq!(account.name(), "user@example.com");
        assert_eq!(account.kind(), "drive");
        assert!(!account.is_syncable());
        assert!(!account.auto_sync());
    }

    #[test]
    fn test_registration_flags() {
        let mut account = SyncAccount::new("user@example.com", "drive");

        account.set_syncable(true);
        account.set_auto_sync(true);
        assert!(account.is_syncable());
        assert!(account.auto_sync());

        account.set_syncable(false);
        assert!(!account.is_syncable());
        // auto_sync is independent of syncable
        assert!(account.auto_sync());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let account = SyncAccount::new("user@example.com", "drive");
        let json = serde_json::to_string(&account).unwrap();
        let back: SyncAccount = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);
    }
}
