//! User interaction port (driven/secondary port)
//!
//! Folder selection and authorization resolution are opaque external flows:
//! the core only knows they exist, take identifiers, and eventually come
//! back with a value or a cancellation. Whether an implementation renders a
//! screen, opens a browser, or just logs an instruction is its own business.

use crate::domain::account::SyncAccount;
use crate::domain::newtypes::{FolderId, ResolutionHandle};

/// Outcome of an authorization resolution flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The failure was remedied; sync may be re-initialized
    Resolved,
    /// The user backed out; no automatic retry
    Cancelled,
}

/// Port trait for external interaction flows
#[async_trait::async_trait]
pub trait IUserInteraction: Send + Sync {
    /// Asks the user to choose a target folder
    ///
    /// Returns `Ok(None)` when no choice was made (cancelled, or the
    /// implementation defers the pick to a later out-of-band step).
    async fn pick_folder(&self, account: &SyncAccount) -> anyhow::Result<Option<FolderId>>;

    /// Runs the resolution step for a recoverable connection failure
    async fn resolve_auth(
        &self,
        account: &SyncAccount,
        handle: &ResolutionHandle,
    ) -> anyhow::Result<ResolutionOutcome>;
}
