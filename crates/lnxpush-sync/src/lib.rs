//! LNXPush Sync - Scheduling and orchestration
//!
//! Provides:
//! - Periodic sync triggering with an interval/flex window
//! - The service API for registering and requesting syncs
//! - The per-trigger orchestration state machine
//! - The authorization-resolution fallback flow
//!
//! ## Modules
//!
//! - [`service`] - `SyncService`: initialize/cancel/sync-now/sync-to-folder
//! - [`scheduler`] - `PeriodicScheduler` emitting periodic triggers
//! - [`orchestrator`] - `SyncOrchestrator` consuming triggers and connection events
//! - [`resolution`] - `AuthResolutionFlow` re-entering sync after a remedy

pub mod orchestrator;
pub mod resolution;
pub mod scheduler;
pub mod service;

#[cfg(test)]
pub(crate) mod testutil;

pub use orchestrator::SyncOrchestrator;
pub use resolution::AuthResolutionFlow;
pub use scheduler::{PeriodicScheduler, ScheduleHandle, SYNC_FLEX, SYNC_INTERVAL};
pub use service::SyncService;
