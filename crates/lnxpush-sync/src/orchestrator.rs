//! Sync orchestration state machine
//!
//! The [`SyncOrchestrator`] consumes [`SyncTrigger`]s and
//! [`ConnectionEvent`]s from two channels and runs one logical sync attempt
//! at a time. There is no blocking wait anywhere: an attempt that needs the
//! connection suspends itself and resumes when the corresponding event
//! arrives.
//!
//! ## Attempt lifecycle
//!
//! ```text
//! trigger ──→ Start (capture params, resolve account)
//!               │ connected?
//!               ├─ yes ──→ sync()
//!               └─ no ───→ Connecting ··· ConnectionEvent
//!                              ├─ Connected ──→ sync()
//!                              ├─ Failed(resolution) ──→ AuthResolutionFlow
//!                              ├─ Failed ──→ log, attempt ends
//!                              └─ Suspended ──→ log, attempt ends
//!
//! sync(): re-validate params against the store, then either
//!         folder-selection (empty folder id) or upload task.
//! ```
//!
//! At most one connection attempt is ever in flight: a trigger arriving
//! while `Connecting` updates the captured parameters but starts no second
//! connection.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use lnxpush_core::domain::account::SyncAccount;
use lnxpush_core::domain::connection::{ConnectionEvent, ConnectionFailure, ConnectionState};
use lnxpush_core::domain::params::SyncParameters;
use lnxpush_core::domain::trigger::SyncTrigger;
use lnxpush_core::ports::cloud_connection::ICloudConnection;
use lnxpush_core::ports::interaction::IUserInteraction;
use lnxpush_core::ports::preference_store::{keys, IPreferenceStore};
use lnxpush_core::ports::upload_task::IUploadTask;
use lnxpush_core::usecases::prepare_attempt::PrepareAttemptUseCase;
use lnxpush_core::usecases::resolve_account::ResolveAccountUseCase;

use crate::resolution::AuthResolutionFlow;

/// The sync attempt currently waiting on the connection
struct PendingAttempt {
    /// Raw payload captured at Start; re-validated against the store once
    /// the connection is up
    payload: SyncParameters,
    /// Account resolved fresh for this attempt
    account: SyncAccount,
}

/// Per-trigger sync state machine
///
/// Owns the connection object exclusively; the connection is bound to one
/// account and must be recreated to sync under a different one.
pub struct SyncOrchestrator {
    trigger_rx: mpsc::Receiver<SyncTrigger>,
    event_rx: mpsc::Receiver<ConnectionEvent>,
    connection: Arc<dyn ICloudConnection>,
    resolver: ResolveAccountUseCase,
    prepare: PrepareAttemptUseCase,
    store: Arc<dyn IPreferenceStore>,
    interaction: Arc<dyn IUserInteraction>,
    uploader: Arc<dyn IUploadTask>,
    resolution: AuthResolutionFlow,
    shutdown: CancellationToken,
    state: ConnectionState,
    pending: Option<PendingAttempt>,
}

impl SyncOrchestrator {
    /// Creates a new SyncOrchestrator
    ///
    /// # Arguments
    /// * `trigger_rx` - Trigger channel fed by the scheduler and service
    /// * `event_rx` - Connection event channel fed by the connection adapter
    /// * `connection` - Cloud connection port
    /// * `resolver` - Fresh-per-attempt account resolution
    /// * `prepare` - Parameter resolution with store fallback
    /// * `store` - Preference store (persists folder picks)
    /// * `interaction` - Folder selection / auth resolution capabilities
    /// * `uploader` - Upload task port
    /// * `resolution` - Flow spawned on recoverable connection failures
    /// * `shutdown` - Cooperative shutdown token
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trigger_rx: mpsc::Receiver<SyncTrigger>,
        event_rx: mpsc::Receiver<ConnectionEvent>,
        connection: Arc<dyn ICloudConnection>,
        resolver: ResolveAccountUseCase,
        prepare: PrepareAttemptUseCase,
        store: Arc<dyn IPreferenceStore>,
        interaction: Arc<dyn IUserInteraction>,
        uploader: Arc<dyn IUploadTask>,
        resolution: AuthResolutionFlow,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            trigger_rx,
            event_rx,
            connection,
            resolver,
            prepare,
            store,
            interaction,
            uploader,
            resolution,
            shutdown,
            state: ConnectionState::Disconnected,
            pending: None,
        }
    }

    /// Main event loop
    ///
    /// Processes triggers and connection events one at a time until the
    /// shutdown token fires or both channels close.
    pub async fn run(mut self) {
        info!("Sync orchestrator starting");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received, orchestrator stopping");
                    break;
                }
                trigger = self.trigger_rx.recv() => match trigger {
                    Some(trigger) => self.on_trigger(trigger).await,
                    None => {
                        info!("Trigger channel closed, orchestrator stopping");
                        break;
                    }
                },
                event = self.event_rx.recv() => match event {
                    Some(event) => self.on_event(event).await,
                    None => {
                        info!("Connection event channel closed, orchestrator stopping");
                        break;
                    }
                },
            }
        }

        info!("Sync orchestrator stopped");
    }

    /// Start step: capture parameters, resolve the account, connect or
    /// proceed
    async fn on_trigger(&mut self, trigger: SyncTrigger) {
        debug!(
            manual = trigger.manual,
            expedited = trigger.expedited,
            "Sync trigger received"
        );

        // Resolved fresh on every attempt, never cached
        let account = match self.resolver.resolve().await {
            Ok(account) => account,
            Err(e) => {
                warn!(error = %e, "Sync attempt aborted");
                return;
            }
        };

        if !account.is_syncable() {
            debug!(account = %account.name(), "Account is not syncable, ignoring trigger");
            return;
        }

        self.pending = Some(PendingAttempt {
            payload: trigger.params,
            account,
        });

        match &self.state {
            ConnectionState::Connected => self.sync().await,
            ConnectionState::Connecting => {
                // The in-flight attempt picks up the refreshed parameters
                debug!("Connection attempt already in flight");
            }
            _ => {
                self.state = ConnectionState::Connecting;
                debug!("Establishing cloud connection");
                if let Err(e) = self.connection.connect().await {
                    let reason = format!("{e:#}");
                    error!(error = %reason, "Failed to start connection attempt");
                    self.state = ConnectionState::Failed(reason);
                    self.pending = None;
                }
            }
        }
    }

    /// Folds a connection event into the state machine
    async fn on_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                debug!("Cloud connection established");
                self.state = ConnectionState::Connected;
                self.sync().await;
            }
            ConnectionEvent::Suspended(code) => {
                // Transient; the scheduler re-delivers triggers
                info!(code, "Cloud connection suspended");
                self.state = ConnectionState::Disconnected;
            }
            ConnectionEvent::Failed(failure) => self.on_connection_failed(failure).await,
        }
    }

    /// ConnectionFailed step: route to resolution or terminate
    async fn on_connection_failed(&mut self, failure: ConnectionFailure) {
        self.state = ConnectionState::Failed(failure.reason.clone());
        let pending = self.pending.take();

        match (failure.resolution, pending) {
            (Some(handle), Some(attempt)) => {
                info!(
                    reason = %failure.reason,
                    "Connection failed recoverably, starting authorization resolution"
                );
                let flow = self.resolution.clone();
                let file_title = attempt.payload.file_title;
                let local_file_path = attempt.payload.local_file_path;
                tokio::spawn(async move {
                    flow.run(attempt.account, handle, file_title, local_file_path)
                        .await;
                });
            }
            (Some(_), None) => {
                warn!(
                    reason = %failure.reason,
                    "Connection failed recoverably but no sync attempt is pending"
                );
            }
            (None, _) => {
                // Terminal for this attempt; no automatic retry
                error!(reason = %failure.reason, "Connection failed with no resolution");
            }
        }
    }

    /// Connected step: re-validate parameters, then folder selection or
    /// upload
    async fn sync(&mut self) {
        let Some(attempt) = self.pending.take() else {
            debug!("Connected with no pending sync attempt");
            return;
        };

        // Re-validate against the store: payload fields captured at Start
        // may have been superseded by a pick or an explicit request.
        let params = match self.prepare.resolve_parameters(&attempt.payload).await {
            Ok(params) => params,
            Err(e) => {
                error!(error = %format!("{e:#}"), "Failed to resolve sync parameters");
                return;
            }
        };

        if params.needs_folder_selection() {
            info!("No target folder known, requesting folder selection");
            self.start_folder_selection(attempt.account);
            return;
        }

        // Terminal configuration error: a folder without a target file
        if let Err(e) = params.require_target() {
            error!(error = %e, "Sync attempt aborted");
            return;
        }

        let folder = match params.folder() {
            Ok(folder) => folder,
            Err(e) => {
                error!(error = %e, "Sync attempt aborted");
                return;
            }
        };

        info!(
            file_title = %params.file_title,
            folder = %folder,
            "Starting upload task"
        );

        // Fire-and-forget: transfer completion is the task's own contract
        let uploader = Arc::clone(&self.uploader);
        tokio::spawn(async move {
            if let Err(e) = uploader
                .start(
                    &params.file_title,
                    Path::new(&params.local_file_path),
                    &folder,
                    None,
                )
                .await
            {
                error!(error = %format!("{e:#}"), "Upload task failed");
            }
        });
    }

    /// Launches the folder-selection flow and ends this attempt
    ///
    /// A pick is persisted to the store and used on the *next* trigger;
    /// nothing waits on it synchronously.
    fn start_folder_selection(&self, account: SyncAccount) {
        let interaction = Arc::clone(&self.interaction);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match interaction.pick_folder(&account).await {
                Ok(Some(folder)) => {
                    if let Err(e) = store.set(keys::FOLDER_ID, folder.as_str()).await {
                        error!(error = %format!("{e:#}"), "Failed to persist picked folder");
                    } else {
                        info!(folder = %folder, "Folder selected, takes effect on the next sync");
                    }
                }
                Ok(None) => {
                    info!("Folder selection ended without a choice");
                }
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Folder selection failed");
                }
            }
        });
    }
}
