//! LNXPush Daemon - Background synchronization service
//!
//! This binary runs as a systemd user service and handles:
//! - Registering the sync account and periodic schedule
//! - Processing sync triggers (periodic and D-Bus requested)
//! - D-Bus interface for CLI clients
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon wires the store, drive, and sync components together, starts
//! the D-Bus service, waits until a usable account exists, registers sync,
//! and then lets the scheduler and orchestrator tasks run until a
//! `CancellationToken` fires on SIGTERM or SIGINT.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lnxpush_core::config::Config;
use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::ports::account_directory::IAccountDirectory;
use lnxpush_core::ports::cloud_connection::ICloudConnection;
use lnxpush_core::ports::interaction::IUserInteraction;
use lnxpush_core::ports::preference_store::IPreferenceStore;
use lnxpush_core::ports::upload_task::IUploadTask;
use lnxpush_core::usecases::{PrepareAttemptUseCase, ResolveAccountUseCase};
use lnxpush_drive::auth::DriveOAuthConfig;
use lnxpush_drive::{
    DriveAuthenticator, DriveConnection, DriveUploadTask, HeadlessInteraction, KeyringTokenStorage,
};
use lnxpush_ipc::{DaemonState, DaemonSyncState, DbusService, DBUS_NAME};
use lnxpush_store::{DatabasePool, SqliteAccountDirectory, SqlitePreferenceStore};
use lnxpush_sync::{
    AuthResolutionFlow, PeriodicScheduler, ScheduleHandle, SyncOrchestrator, SyncService,
};

/// How often the daemon re-checks for a usable account before sync is
/// registered
const ACCOUNT_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Capacity of the trigger and connection-event channels
const CHANNEL_CAPACITY: usize = 16;

/// Main daemon service that wires and supervises the sync components
struct DaemonService {
    /// Application configuration loaded from YAML
    config: Config,
    /// Preference store adapter
    store: Arc<dyn IPreferenceStore>,
    /// Account directory adapter
    directory: Arc<dyn IAccountDirectory>,
    /// Shared state between daemon and D-Bus interface
    daemon_state: Arc<Mutex<DaemonState>>,
    /// Token for signalling graceful shutdown to all async tasks
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Loads configuration, opens the database, and initializes shared state
    async fn new(shutdown: CancellationToken) -> Result<Self> {
        let config_path = Config::default_path();
        let config = Config::load_or_default(&config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        let db_path = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("lnxpush")
            .join("lnxpush.db");

        let pool = DatabasePool::new(&db_path)
            .await
            .context("Failed to open database")?;

        let store: Arc<dyn IPreferenceStore> =
            Arc::new(SqlitePreferenceStore::new(pool.pool().clone()));
        let directory: Arc<dyn IAccountDirectory> = Arc::new(SqliteAccountDirectory::new(
            pool.pool().clone(),
            config.account.allow_enumeration,
        ));

        Ok(Self {
            config,
            store,
            directory,
            daemon_state: Arc::new(Mutex::new(DaemonState::default())),
            shutdown,
        })
    }

    /// Runs the daemon to completion
    ///
    /// 1. Waits for a usable account (re-checking periodically)
    /// 2. Wires the drive adapters, orchestrator, and scheduler
    /// 3. Starts the D-Bus service
    /// 4. Registers sync and parks until shutdown
    async fn run(&self) -> Result<()> {
        // Wait until an account is registered (e.g. via `lnxpush account add`)
        let account = match self.wait_for_account().await {
            Some(account) => account,
            None => {
                info!("Shutdown before an account became available");
                return Ok(());
            }
        };

        let (trigger_tx, trigger_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let schedule = Arc::new(ScheduleHandle::new());

        // Drive adapters, all bound to the resolved account
        if self.config.drive.app_id.is_none() {
            warn!("drive.app_id is not configured; authorization will fail until it is set");
        }
        let authenticator = Arc::new(DriveAuthenticator::new(
            DriveOAuthConfig::new(self.config.drive.app_id.clone().unwrap_or_default()),
            Arc::new(KeyringTokenStorage),
        ));
        let connection: Arc<dyn ICloudConnection> = Arc::new(DriveConnection::new(
            Arc::clone(&authenticator),
            account.name(),
            event_tx,
        ));
        let interaction: Arc<dyn IUserInteraction> = Arc::new(HeadlessInteraction::new(
            Arc::clone(&authenticator),
        ));
        let uploader: Arc<dyn IUploadTask> = Arc::new(DriveUploadTask::new(
            Arc::clone(&authenticator),
            account.name(),
        ));

        let service = Arc::new(SyncService::new(
            trigger_tx.clone(),
            Arc::clone(&self.directory),
            Arc::clone(&self.store),
            Arc::clone(&schedule),
            &self.config.account,
        ));

        let orchestrator = SyncOrchestrator::new(
            trigger_rx,
            event_rx,
            connection,
            ResolveAccountUseCase::new(
                Arc::clone(&self.directory),
                &self.config.account.kind,
                self.config.account.selection,
            ),
            PrepareAttemptUseCase::new(Arc::clone(&self.store)),
            Arc::clone(&self.store),
            Arc::clone(&interaction),
            uploader,
            AuthResolutionFlow::new(interaction, Arc::clone(&service)),
            self.shutdown.child_token(),
        );
        tokio::spawn(orchestrator.run());

        let scheduler = PeriodicScheduler::new(
            trigger_tx,
            Arc::clone(&schedule),
            self.shutdown.child_token(),
        );
        tokio::spawn(scheduler.run());

        // D-Bus service; the acquired name doubles as the instance lock
        let dbus_service = DbusService::new(Arc::clone(&service), Arc::clone(&self.daemon_state));
        let _dbus_connection = match dbus_service.start().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                let err_str = format!("{e:#}");
                if err_str.contains("already taken")
                    || err_str.contains("already owned")
                    || err_str.contains("NameTaken")
                {
                    error!(
                        "Another instance of lnxpushd is already running (D-Bus name {} is taken)",
                        DBUS_NAME
                    );
                    anyhow::bail!("Another instance of lnxpushd is already running");
                }
                // No session bus (e.g. headless server): keep syncing anyway
                warn!(error = %err_str, "D-Bus service unavailable, continuing without IPC");
                None
            }
        };

        // Register the account and fire the initial sync
        let file_title = self.config.sync.file_title.clone();
        let local_file_path = self.config.sync.local_file_path.display().to_string();
        if file_title.is_empty() || local_file_path.is_empty() {
            warn!("sync.file_title / sync.local_file_path not configured; uploads cannot start");
        }

        if service.initialize_sync(&file_title, &local_file_path).await {
            let mut state = self.daemon_state.lock().await;
            state.sync_state = DaemonSyncState::Active;
            state.account_name = Some(account.name().to_string());
        } else {
            let mut state = self.daemon_state.lock().await;
            state.sync_state = DaemonSyncState::Error("sync registration failed".to_string());
        }

        // Park until shutdown; the spawned tasks do the work
        self.shutdown.cancelled().await;
        info!("Shutdown signal received");
        Ok(())
    }

    /// Waits until the account directory yields a usable account
    ///
    /// Returns `None` if shutdown fires first.
    async fn wait_for_account(&self) -> Option<SyncAccount> {
        let resolver = ResolveAccountUseCase::new(
            Arc::clone(&self.directory),
            &self.config.account.kind,
            self.config.account.selection,
        );

        loop {
            match resolver.resolve().await {
                Ok(account) => {
                    info!(account = %account.name(), "Found sync account");
                    return Some(account);
                }
                Err(e) => {
                    {
                        let mut state = self.daemon_state.lock().await;
                        state.sync_state = DaemonSyncState::WaitingForAccount;
                    }
                    info!(
                        error = %e,
                        "No usable account yet. Add one with 'lnxpush account add <name>'."
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(ACCOUNT_CHECK_INTERVAL) => {}
                _ = self.shutdown.cancelled() => return None,
            }
        }
    }
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!("LNXPush daemon starting (lnxpushd)");

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(shutdown_token.clone()).await?;

    let result = service.run().await;

    match &result {
        Ok(()) => info!("LNXPush daemon shut down gracefully"),
        Err(e) => error!(error = %e, "LNXPush daemon exiting with error"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_child_propagation() {
        let parent = CancellationToken::new();
        let child1 = parent.child_token();
        let child2 = parent.child_token();

        assert!(!child1.is_cancelled());
        assert!(!child2.is_cancelled());

        parent.cancel();

        assert!(child1.is_cancelled());
        assert!(child2.is_cancelled());
    }

    #[test]
    fn test_config_default_path_is_nonempty() {
        let path = Config::default_path();
        assert!(!path.as_os_str().is_empty());
    }

    #[test]
    fn test_channel_capacity_is_sane() {
        assert!(CHANNEL_CAPACITY >= 2);
    }
}
