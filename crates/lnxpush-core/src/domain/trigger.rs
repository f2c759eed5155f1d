//! Sync trigger payload
//!
//! A [`SyncTrigger`] is one invocation request delivered to the orchestrator:
//! either a periodic tick from the scheduler or a manual request from the
//! service API, optionally carrying explicit target parameters.

use serde::{Deserialize, Serialize};

use super::params::SyncParameters;

/// One synchronization invocation request
///
/// The `manual` and `expedited` flags are informational to the orchestrator;
/// delivery order and timing are the scheduler's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTrigger {
    /// Target parameters; empty fields fall back to the preference store
    pub params: SyncParameters,
    /// Whether this trigger was user-initiated
    pub manual: bool,
    /// Whether this trigger should run ahead of the periodic cadence
    pub expedited: bool,
}

impl SyncTrigger {
    /// A periodic trigger carrying no overrides
    pub fn periodic() -> Self {
        Self {
            params: SyncParameters::empty(),
            manual: false,
            expedited: false,
        }
    }

    /// A manual, expedited trigger carrying no overrides
    ///
    /// The orchestrator falls back to the preference store for every field.
    pub fn manual() -> Self {
        Self {
            params: SyncParameters::empty(),
            manual: true,
            expedited: true,
        }
    }

    /// A manual, expedited trigger carrying explicit parameters
    ///
    /// Payload fields take precedence over stored values.
    pub fn with_params(params: SyncParameters) -> Self {
        Self {
            params,
            manual: true,
            expedited: true,
        }
    }
}
