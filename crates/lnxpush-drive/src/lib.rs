//! LNXPush Drive - Cloud drive adapter
//!
//! Driven-side adapters implementing the core's cloud-facing ports against
//! a Google Drive style HTTP API:
//!
//! - [`client`] - Typed HTTP client (about endpoint, multipart upload)
//! - [`auth`] - OAuth2 PKCE flow, keyring token storage, callback server
//! - [`connection`] - `ICloudConnection` implementation with event emission
//! - [`upload`] - `IUploadTask` implementation
//! - [`interaction`] - Headless `IUserInteraction` implementation

pub mod auth;
pub mod client;
pub mod connection;
pub mod error;
pub mod interaction;
pub mod upload;

pub use auth::{DriveAuthenticator, ITokenStorage, KeyringTokenStorage, MemoryTokenStorage, Tokens};
pub use client::DriveClient;
pub use connection::DriveConnection;
pub use error::DriveApiError;
pub use interaction::HeadlessInteraction;
pub use upload::DriveUploadTask;
