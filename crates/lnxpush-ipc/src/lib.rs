//! LNXPush IPC - D-Bus control surface
//!
//! Exposes the running daemon to CLI and desktop clients over the session
//! bus. One interface, `com.enigmora.LNXPush.SyncController`, forwards
//! sync requests to the in-process `SyncService` and reports daemon status.

pub mod proxy;
pub mod service;

pub use proxy::SyncControllerProxy;
pub use service::{DaemonState, DaemonSyncState, DbusService, DBUS_NAME, DBUS_PATH};
