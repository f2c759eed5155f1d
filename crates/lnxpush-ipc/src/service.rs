//! D-Bus service implementation for LNXPush
//!
//! Provides the D-Bus interface that CLI and desktop clients use to talk
//! to the running LNXPush daemon:
//!
//! - `com.enigmora.LNXPush.SyncController` - request syncs, cancel, query
//!   status
//!
//! A signal is emitted whenever the daemon state changes.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use lnxpush_sync::SyncService;

/// D-Bus well-known name for the LNXPush daemon
pub const DBUS_NAME: &str = "com.enigmora.LNXPush";

/// D-Bus object path for the service
pub const DBUS_PATH: &str = "/com/enigmora/LNXPush";

// ============================================================================
// Daemon state shared with the D-Bus interface
// ============================================================================

/// Possible daemon states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonSyncState {
    /// Daemon is starting up
    Starting,
    /// No usable account yet; sync registration is retried periodically
    WaitingForAccount,
    /// Sync is registered; triggers are being processed
    Active,
    /// Daemon encountered an error
    Error(String),
}

impl std::fmt::Display for DaemonSyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaemonSyncState::Starting => write!(f, "starting"),
            DaemonSyncState::WaitingForAccount => write!(f, "waiting_for_account"),
            DaemonSyncState::Active => write!(f, "active"),
            DaemonSyncState::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

/// Shared state between the daemon and the D-Bus interface
pub struct DaemonState {
    /// Current daemon state
    pub sync_state: DaemonSyncState,
    /// Name of the registered account (if any)
    pub account_name: Option<String>,
}

impl Default for DaemonState {
    fn default() -> Self {
        Self {
            sync_state: DaemonSyncState::Starting,
            account_name: None,
        }
    }
}

// ============================================================================
// SyncController interface
// ============================================================================

/// D-Bus interface for controlling synchronization
///
/// Forwards requests to the daemon's `SyncService` and reads status from
/// the shared daemon state.
pub struct SyncControllerInterface {
    service: Arc<SyncService>,
    state: Arc<Mutex<DaemonState>>,
}

impl SyncControllerInterface {
    /// Creates a new SyncControllerInterface
    pub fn new(service: Arc<SyncService>, state: Arc<Mutex<DaemonState>>) -> Self {
        Self { service, state }
    }
}

#[zbus::interface(name = "com.enigmora.LNXPush.SyncController")]
impl SyncControllerInterface {
    /// Registers the account for sync and fires the initial sync
    ///
    /// Returns `true` iff an account was found and registration completed.
    async fn initialize_sync(&self, file_title: String, file_path: String) -> bool {
        info!("InitializeSync requested via D-Bus");
        let registered = self.service.initialize_sync(&file_title, &file_path).await;

        let mut state = self.state.lock().await;
        if registered {
            state.sync_state = DaemonSyncState::Active;
        }
        registered
    }

    /// Requests an immediate sync with no parameter overrides
    ///
    /// Stored preferences supply the folder, title, and path.
    async fn sync_now(&self) {
        info!("SyncNow requested via D-Bus");
        self.service.sync_now().await;
    }

    /// Requests an immediate sync into an explicit folder
    ///
    /// Non-empty parameters are persisted and take precedence over stored
    /// values. Passing an empty `file_title`/`file_path` keeps the stored
    /// ones.
    async fn sync_to_folder(&self, folder_id: String, file_title: String, file_path: String) {
        info!(folder_id = %folder_id, "SyncToFolder requested via D-Bus");
        self.service
            .sync_to_folder(&folder_id, &file_title, &file_path)
            .await;
    }

    /// Disables sync for the registered account
    async fn cancel_sync(&self) {
        info!("CancelSync requested via D-Bus");
        self.service.cancel_sync().await;
    }

    /// Returns the current daemon status as a JSON string
    ///
    /// The returned JSON contains:
    /// - `state`: Current daemon state (starting, waiting_for_account, ...)
    /// - `account`: Name of the registered account (if any)
    async fn get_status(&self) -> String {
        let state = self.state.lock().await;
        serde_json::json!({
            "state": state.sync_state.to_string(),
            "account": state.account_name,
        })
        .to_string()
    }

    /// Emitted when the daemon state changes
    #[zbus(signal)]
    async fn state_changed(signal_ctxt: &zbus::SignalContext<'_>, state: &str) -> zbus::Result<()>;
}

// ============================================================================
// DbusService - high-level service orchestrator
// ============================================================================

/// High-level D-Bus service wrapper
///
/// Creates a `zbus::Connection` on the session bus, registers the
/// interface at the well-known path, and requests the well-known name
/// `com.enigmora.LNXPush` (which doubles as the single-instance lock).
pub struct DbusService {
    service: Arc<SyncService>,
    state: Arc<Mutex<DaemonState>>,
}

impl DbusService {
    /// Creates a new DbusService
    pub fn new(service: Arc<SyncService>, state: Arc<Mutex<DaemonState>>) -> Self {
        Self { service, state }
    }

    /// Returns a reference to the shared daemon state
    pub fn state(&self) -> &Arc<Mutex<DaemonState>> {
        &self.state
    }

    /// Starts the D-Bus service on the session bus
    ///
    /// Returns the connection, which must be kept alive for the service to
    /// remain active.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The session bus is not available
    /// - The well-known name is already owned (another instance running)
    /// - Interface registration fails
    pub async fn start(&self) -> anyhow::Result<zbus::Connection> {
        info!("Starting D-Bus service on session bus");

        let controller =
            SyncControllerInterface::new(Arc::clone(&self.service), Arc::clone(&self.state));

        let connection = zbus::connection::Builder::session()?
            .name(DBUS_NAME)?
            .serve_at(DBUS_PATH, controller)?
            .build()
            .await?;

        info!(
            name = DBUS_NAME,
            path = DBUS_PATH,
            "D-Bus service started successfully"
        );

        Ok(connection)
    }
}

// ============================================================================
// Tests
// ============================================================================
