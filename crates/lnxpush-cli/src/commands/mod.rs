//! CLI command implementations

pub mod account;
pub mod daemon;
pub mod status;
pub mod sync;

use std::path::PathBuf;

/// Path of the shared LNXPush database
pub(crate) fn database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lnxpush")
        .join("lnxpush.db")
}
