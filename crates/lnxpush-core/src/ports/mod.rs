//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IAccountDirectory`] - Account enumeration and registration flags
//! - [`IPreferenceStore`] - Key-value persistence for sync parameters
//! - [`ICloudConnection`] - Async cloud connection lifecycle
//! - [`IUserInteraction`] - Folder selection and auth resolution hand-offs
//! - [`IUploadTask`] - The actual file transfer (external collaborator)

pub mod account_directory;
pub mod cloud_connection;
pub mod interaction;
pub mod preference_store;
pub mod upload_task;

pub use account_directory::IAccountDirectory;
pub use cloud_connection::ICloudConnection;
pub use interaction::{IUserInteraction, ResolutionOutcome};
pub use preference_store::{keys, IPreferenceStore};
pub use upload_task::{IUploadTask, ProgressFn};
