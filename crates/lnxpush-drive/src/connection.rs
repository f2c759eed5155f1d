//! Drive connection lifecycle adapter
//!
//! Implements the `ICloudConnection` port. A connection attempt validates
//! (and if needed refreshes) the stored access token against the drive
//! `about` endpoint and reports the outcome as a single
//! [`ConnectionEvent`] pushed into the orchestrator's event channel:
//!
//! - valid token, API reachable            → `Connected`
//! - missing tokens / refresh rejected /
//!   API answers 401 or 403               → `Failed` with a resolution handle
//! - API answers 5xx                       → `Suspended(status)`
//! - transport error                       → `Failed` without resolution
//!
//! The connection object is bound to one account; syncing under a different
//! account requires constructing a new one.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use lnxpush_core::domain::connection::{ConnectionEvent, ConnectionFailure};
use lnxpush_core::ports::cloud_connection::ICloudConnection;

use crate::auth::DriveAuthenticator;
use crate::client::DriveClient;

/// `ICloudConnection` implementation over the drive HTTP API
pub struct DriveConnection {
    authenticator: Arc<DriveAuthenticator>,
    account_name: String,
    api_base: Option<String>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    connected: Arc<AtomicBool>,
}

impl DriveConnection {
    /// Creates a connection bound to `account_name` against the production
    /// API
    pub fn new(
        authenticator: Arc<DriveAuthenticator>,
        account_name: impl Into<String>,
        event_tx: mpsc::Sender<ConnectionEvent>,
    ) -> Self {
        Self {
            authenticator,
            account_name: account_name.into(),
            api_base: None,
            event_tx,
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overrides the API base URL (used by tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Runs one probe to completion and classifies the outcome
    async fn probe(
        authenticator: Arc<DriveAuthenticator>,
        account_name: String,
        api_base: Option<String>,
    ) -> ConnectionEvent {
        let tokens = match authenticator.current_tokens(&account_name).await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                return recoverable(&authenticator, "authorization required".to_string());
            }
            Err(e) => {
                return recoverable(&authenticator, format!("token refresh rejected: {e:#}"));
            }
        };

        let client = match api_base {
            Some(base) => DriveClient::with_base_urls(tokens.access_token, base.clone(), base),
            None => DriveClient::new(tokens.access_token),
        };

        match client.about().await {
            Ok(about) => {
                debug!(
                    account = %account_name,
                    user = ?about.user.and_then(|u| u.email_address),
                    "Drive API probe succeeded"
                );
                ConnectionEvent::Connected
            }
            Err(e) if e.is_auth_failure() => recoverable(&authenticator, e.to_string()),
            Err(e) if e.is_server_error() => {
                // Transient on the provider's side; scheduler re-triggers
                ConnectionEvent::Suspended(i32::from(e.status().unwrap_or(0)))
            }
            Err(e) => ConnectionEvent::Failed(ConnectionFailure::fatal(e.to_string())),
        }
    }
}

/// Builds a recoverable failure carrying a fresh authorization handle
///
/// Falls back to a fatal failure when not even an authorization URL can be
/// produced (e.g. no app id configured).
fn recoverable(authenticator: &DriveAuthenticator, reason: String) -> ConnectionEvent {
    match authenticator.authorization_handle() {
        Ok(handle) => ConnectionEvent::Failed(ConnectionFailure::recoverable(reason, handle)),
        Err(e) => ConnectionEvent::Failed(ConnectionFailure::fatal(format!(
            "{reason}; no resolution available: {e:#}"
        ))),
    }
}

#[async_trait::async_trait]
impl ICloudConnection for DriveConnection {
    async fn connect(&self) -> anyhow::Result<()> {
        self.connected.store(false, Ordering::Release);

        let authenticator = Arc::clone(&self.authenticator);
        let account_name = self.account_name.clone();
        let api_base = self.api_base.clone();
        let connected = Arc::clone(&self.connected);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = Self::probe(authenticator, account_name, api_base).await;
            connected.store(
                matches!(event, ConnectionEvent::Connected),
                Ordering::Release,
            );
            if event_tx.send(event).await.is_err() {
                warn!("Connection event channel closed, dropping probe result");
            }
        });

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}
