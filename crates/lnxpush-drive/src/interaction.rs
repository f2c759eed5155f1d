//! Headless user interaction adapter
//!
//! The daemon has no UI surface of its own, so both interaction
//! capabilities resolve without a screen:
//!
//! - **Folder selection** defers to the CLI: the adapter announces that a
//!   folder is needed and returns no choice; the user's eventual
//!   `lnxpush sync to-folder <id>` persists the pick, which the next sync
//!   trigger uses.
//! - **Authorization resolution** runs the browser-based OAuth2 PKCE login;
//!   a user who never completes the consent page counts as a cancellation
//!   after a timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::newtypes::{FolderId, ResolutionHandle};
use lnxpush_core::ports::interaction::{IUserInteraction, ResolutionOutcome};

use crate::auth::DriveAuthenticator;

/// How long the resolution flow waits for the user to finish the consent
/// page before treating the attempt as cancelled
const RESOLUTION_TIMEOUT: Duration = Duration::from_secs(300);

/// `IUserInteraction` implementation without a UI
pub struct HeadlessInteraction {
    authenticator: Arc<DriveAuthenticator>,
}

impl HeadlessInteraction {
    /// Creates a new HeadlessInteraction
    pub fn new(authenticator: Arc<DriveAuthenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait::async_trait]
impl IUserInteraction for HeadlessInteraction {
    async fn pick_folder(&self, account: &SyncAccount) -> anyhow::Result<Option<FolderId>> {
        info!(
            account = %account.name(),
            "No target folder configured. Pick one with: lnxpush sync to-folder <folder-id>"
        );
        Ok(None)
    }

    async fn resolve_auth(
        &self,
        account: &SyncAccount,
        handle: &ResolutionHandle,
    ) -> anyhow::Result<ResolutionOutcome> {
        info!(
            account = %account.name(),
            consent_url = %handle,
            "Drive authorization required, starting browser consent flow"
        );

        match tokio::time::timeout(RESOLUTION_TIMEOUT, self.authenticator.login(account.name()))
            .await
        {
            Ok(Ok(_tokens)) => Ok(ResolutionOutcome::Resolved),
            Ok(Err(e)) => Err(e.context("Browser consent flow failed")),
            Err(_) => {
                warn!(account = %account.name(), "Consent flow timed out, treating as cancelled");
                Ok(ResolutionOutcome::Cancelled)
            }
        }
    }
}
