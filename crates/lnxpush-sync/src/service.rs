//! Sync service - registration and trigger API
//!
//! The [`SyncService`] is the single entry point callers use to register an
//! account for synchronization and to request immediate syncs. It is
//! constructed once at process start and handed around by `Arc`; all side
//! effects are delegated to the account directory, the preference store,
//! the [`ScheduleHandle`](super::scheduler::ScheduleHandle), and the trigger
//! channel — the service holds no mutable state of its own.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use lnxpush_core::config::AccountConfig;
use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::params::SyncParameters;
use lnxpush_core::domain::trigger::SyncTrigger;
use lnxpush_core::ports::account_directory::IAccountDirectory;
use lnxpush_core::ports::preference_store::{store_parameters, IPreferenceStore};
use lnxpush_core::usecases::resolve_account::ResolveAccountUseCase;

use crate::scheduler::{ScheduleHandle, SYNC_FLEX, SYNC_INTERVAL};

/// Service object for sync registration and immediate sync requests
pub struct SyncService {
    trigger_tx: mpsc::Sender<SyncTrigger>,
    directory: Arc<dyn IAccountDirectory>,
    store: Arc<dyn IPreferenceStore>,
    schedule: Arc<ScheduleHandle>,
    resolver: ResolveAccountUseCase,
}

impl SyncService {
    /// Creates a new SyncService
    ///
    /// # Arguments
    /// * `trigger_tx` - Sender feeding the orchestrator's trigger channel
    /// * `directory` - Account directory port
    /// * `store` - Preference store port
    /// * `schedule` - Shared periodic-schedule registration flag
    /// * `account` - Account lookup configuration (kind, selection policy)
    pub fn new(
        trigger_tx: mpsc::Sender<SyncTrigger>,
        directory: Arc<dyn IAccountDirectory>,
        store: Arc<dyn IPreferenceStore>,
        schedule: Arc<ScheduleHandle>,
        account: &AccountConfig,
    ) -> Self {
        let resolver =
            ResolveAccountUseCase::new(Arc::clone(&directory), &account.kind, account.selection);
        Self {
            trigger_tx,
            directory,
            store,
            schedule,
            resolver,
        }
    }

    /// Registers the resolved account for periodic sync and kicks off one
    /// immediate sync
    ///
    /// Returns `true` iff an account was found and registration completed.
    /// On `false`, nothing beyond the account lookup was attempted.
    ///
    /// The immediate sync is issued with an **empty folder id**, forcing
    /// folder selection on a first run where no folder is stored yet.
    pub async fn initialize_sync(&self, file_title: &str, local_file_path: &str) -> bool {
        let account = match self.resolver.resolve().await {
            Ok(account) => account,
            Err(e) => {
                warn!(error = %e, "Sync initialization failed, no usable account");
                return false;
            }
        };

        if let Err(e) = self.register_account(&account).await {
            error!(account = %account.name(), error = %format!("{e:#}"), "Account registration failed");
            return false;
        }

        // Finally, a sync to get things started
        self.sync_to_folder("", file_title, local_file_path).await;

        info!(account = %account.name(), "Sync initialized");
        true
    }

    /// Marks the account syncable, enables automatic sync, and installs the
    /// periodic schedule
    async fn register_account(&self, account: &SyncAccount) -> anyhow::Result<()> {
        // Inform the directory that this account supports sync
        self.directory.set_syncable(account.id(), true).await?;
        // Enable periodic sync for it
        self.directory.set_auto_sync(account.id(), true).await?;

        if self.schedule.enable() {
            info!(
                interval_secs = SYNC_INTERVAL.as_secs(),
                flex_secs = SYNC_FLEX.as_secs(),
                "Periodic sync configured"
            );
        } else {
            debug!("Periodic sync already configured");
        }

        Ok(())
    }

    /// Disables sync for the resolved account
    ///
    /// A no-op (not an error) when no account resolves.
    pub async fn cancel_sync(&self) {
        match self.resolver.resolve().await {
            Ok(account) => {
                if let Err(e) = self.directory.set_syncable(account.id(), false).await {
                    warn!(account = %account.name(), error = %format!("{e:#}"), "Failed to disable sync");
                } else {
                    info!(account = %account.name(), "Sync cancelled");
                }
            }
            Err(e) => {
                debug!(error = %e, "No account to cancel sync for");
            }
        }
    }

    /// Requests an immediate, expedited, manual sync with no overrides
    ///
    /// The orchestrator falls back to the preference store for every
    /// parameter.
    pub async fn sync_now(&self) {
        info!("Immediate sync requested");
        if self.trigger_tx.send(SyncTrigger::manual()).await.is_err() {
            error!("Trigger channel closed, cannot request sync");
        }
    }

    /// Requests an immediate, expedited, manual sync with explicit
    /// parameters
    ///
    /// Payload fields take precedence over stored values; non-empty fields
    /// are also persisted so later triggers inherit them.
    pub async fn sync_to_folder(&self, folder_id: &str, file_title: &str, file_path: &str) {
        let params = SyncParameters::new(folder_id, file_title, file_path);

        if let Err(e) = store_parameters(self.store.as_ref(), &params).await {
            warn!(error = %format!("{e:#}"), "Failed to persist sync parameters");
        }

        debug!(folder_id, file_title, "Explicit sync requested");
        if self
            .trigger_tx
            .send(SyncTrigger::with_params(params))
            .await
            .is_err()
        {
            error!("Trigger channel closed, cannot request sync");
        }
    }
}
