//! Client-side D-Bus proxy for the daemon's SyncController interface
//!
//! Used by the CLI to drive a running `lnxpushd`. The generated
//! [`SyncControllerProxy`] targets the daemon's well-known name and path by
//! default.

/// Proxy for `com.enigmora.LNXPush.SyncController`
#[zbus::proxy(
    interface = "com.enigmora.LNXPush.SyncController",
    default_service = "com.enigmora.LNXPush",
    default_path = "/com/enigmora/LNXPush"
)]
pub trait SyncController {
    /// Registers the account for sync and fires the initial sync
    fn initialize_sync(&self, file_title: &str, file_path: &str) -> zbus::Result<bool>;

    /// Requests an immediate sync with stored parameters
    fn sync_now(&self) -> zbus::Result<()>;

    /// Requests an immediate sync into an explicit folder
    fn sync_to_folder(
        &self,
        folder_id: &str,
        file_title: &str,
        file_path: &str,
    ) -> zbus::Result<()>;

    /// Disables sync for the registered account
    fn cancel_sync(&self) -> zbus::Result<()>;

    /// Returns the daemon status as JSON
    fn get_status(&self) -> zbus::Result<String>;
}
