//! Sync control commands
//!
//! All subcommands talk to the running daemon over D-Bus; without a daemon
//! there is nothing to schedule against, so connection failures come back
//! with a hint to start it.

use anyhow::{Context, Result};
use clap::Subcommand;

use lnxpush_ipc::SyncControllerProxy;

use crate::output::{get_formatter, OutputFormat};

/// Initialize, request, or cancel synchronization
#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Register the account for periodic sync and fire the initial sync
    Init {
        /// Title the uploaded file gets in the cloud folder
        #[arg(long)]
        title: String,
        /// Local file to upload on every sync
        #[arg(long)]
        path: String,
    },
    /// Request an immediate sync using the stored parameters
    Now,
    /// Request an immediate sync into an explicit folder
    ///
    /// The folder id is persisted and becomes the target of future syncs.
    ToFolder {
        /// Cloud folder id
        folder_id: String,
        /// Override the stored file title
        #[arg(long, default_value = "")]
        title: String,
        /// Override the stored local file path
        #[arg(long, default_value = "")]
        path: String,
    },
    /// Disable sync for the registered account
    Cancel,
}

impl SyncCommand {
    /// Execute the selected sync subcommand
    pub async fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let proxy = match connect().await {
            Ok(proxy) => proxy,
            Err(e) => {
                formatter.error(&format!("{e:#}"));
                formatter.info("Is the daemon running? Start it with: lnxpush daemon start");
                return Ok(());
            }
        };

        match self {
            SyncCommand::Init { title, path } => {
                let registered = proxy
                    .initialize_sync(title, path)
                    .await
                    .context("InitializeSync call failed")?;
                if registered {
                    formatter.success("Sync initialized");
                } else {
                    formatter.error("Sync initialization failed, no usable account");
                    formatter.info("Register one with: lnxpush account add <name>");
                }
            }
            SyncCommand::Now => {
                proxy.sync_now().await.context("SyncNow call failed")?;
                formatter.success("Sync requested");
            }
            SyncCommand::ToFolder {
                folder_id,
                title,
                path,
            } => {
                proxy
                    .sync_to_folder(folder_id, title, path)
                    .await
                    .context("SyncToFolder call failed")?;
                formatter.success(&format!("Sync to folder '{}' requested", folder_id));
            }
            SyncCommand::Cancel => {
                proxy.cancel_sync().await.context("CancelSync call failed")?;
                formatter.success("Sync cancelled");
            }
        }

        Ok(())
    }
}

/// Connects to the daemon's SyncController interface on the session bus
pub(crate) async fn connect() -> Result<SyncControllerProxy<'static>> {
    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to the session bus")?;
    SyncControllerProxy::new(&connection)
        .await
        .context("Failed to reach the LNXPush daemon")
}
