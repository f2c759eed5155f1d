//! Authorization-resolution flow
//!
//! When a connection attempt fails recoverably, the orchestrator hands the
//! resolution handle plus the current file title and local path to this
//! flow. The flow runs the external resolution step and, on success,
//! re-enters sync through [`SyncService::initialize_sync`] — a restart from
//! the top, not a mid-flow resume. On failure or cancellation the flow just
//! ends; there is no automatic retry.

use std::sync::Arc;

use tracing::{info, warn};

use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::newtypes::ResolutionHandle;
use lnxpush_core::ports::interaction::{IUserInteraction, ResolutionOutcome};

use crate::service::SyncService;

/// Runs the external resolution step and re-enters sync on success
///
/// Cheap to clone; the orchestrator spawns one run per recoverable failure.
#[derive(Clone)]
pub struct AuthResolutionFlow {
    interaction: Arc<dyn IUserInteraction>,
    service: Arc<SyncService>,
}

impl AuthResolutionFlow {
    /// Creates a new AuthResolutionFlow
    pub fn new(interaction: Arc<dyn IUserInteraction>, service: Arc<SyncService>) -> Self {
        Self {
            interaction,
            service,
        }
    }

    /// Runs one resolution attempt to completion
    ///
    /// `file_title` and `local_file_path` are carried through opaquely so
    /// the retry after resolution targets the same file. The flow always
    /// terminates after handling the result, success or not.
    pub async fn run(
        self,
        account: SyncAccount,
        handle: ResolutionHandle,
        file_title: String,
        local_file_path: String,
    ) {
        match self.interaction.resolve_auth(&account, &handle).await {
            Ok(ResolutionOutcome::Resolved) => {
                info!(account = %account.name(), "Authorization resolved, restarting sync");
                if !self
                    .service
                    .initialize_sync(&file_title, &local_file_path)
                    .await
                {
                    warn!("Sync re-initialization after resolution failed");
                }
            }
            Ok(ResolutionOutcome::Cancelled) => {
                info!(account = %account.name(), "Authorization resolution cancelled, not retrying");
            }
            Err(e) => {
                warn!(
                    account = %account.name(),
                    error = %format!("{e:#}"),
                    "Authorization resolution failed"
                );
            }
        }
    }
}
