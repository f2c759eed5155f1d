//! LNXPush Store - Local persistence
//!
//! SQLite-based storage for:
//! - Sync target preferences (folder id, file title, local path)
//! - Registered sync accounts and their registration flags
//!
//! ## Architecture
//!
//! This crate implements the `IPreferenceStore` and `IAccountDirectory`
//! ports from `lnxpush-core` using SQLite as the storage backend. It is a
//! driven (secondary) adapter in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqlitePreferenceStore`] - `IPreferenceStore` implementation
//! - [`SqliteAccountDirectory`] - `IAccountDirectory` implementation
//! - [`StoreError`] - Error types for storage operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use lnxpush_store::{DatabasePool, SqlitePreferenceStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/lnxpush/state.db")).await?;
//! let prefs = SqlitePreferenceStore::new(pool.pool().clone());
//! // Use prefs as IPreferenceStore...
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod pool;
pub mod preferences;

pub use accounts::SqliteAccountDirectory;
pub use pool::DatabasePool;
pub use preferences::SqlitePreferenceStore;

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization or deserialization of domain types failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
