//! Account directory port (driven/secondary port)
//!
//! Abstracts wherever sync-capable accounts live. The capability check
//! mirrors a platform accounts permission: when enumeration is not allowed,
//! every account-dependent operation fails closed.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - Enumeration order is adapter-defined and not guaranteed to be stable;
//!   selection policy is the caller's concern.

use crate::domain::account::SyncAccount;
use crate::domain::newtypes::AccountId;

/// Port trait for account enumeration and registration flags
#[async_trait::async_trait]
pub trait IAccountDirectory: Send + Sync {
    /// Returns whether account enumeration is permitted at all
    ///
    /// A `false` here is a hard stop for any account-dependent operation.
    async fn can_enumerate(&self) -> anyhow::Result<bool>;

    /// Lists accounts of the given provider kind, in adapter order
    async fn accounts_of_kind(&self, kind: &str) -> anyhow::Result<Vec<SyncAccount>>;

    /// Marks an account as syncable or not
    async fn set_syncable(&self, id: &AccountId, syncable: bool) -> anyhow::Result<()>;

    /// Enables or disables automatic (periodic) sync for an account
    async fn set_auto_sync(&self, id: &AccountId, enabled: bool) -> anyhow::Result<()>;
}
