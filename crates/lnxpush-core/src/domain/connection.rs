//! Connection state machine types
//!
//! The cloud client's callback trio (connected / suspended / failed) is
//! re-expressed as a [`ConnectionEvent`] enum delivered over a channel and
//! folded into a single explicit [`ConnectionState`] owned by the
//! orchestrator. Events are processed one at a time; there is no blocking
//! wait anywhere in the state machine.

use serde::{Deserialize, Serialize};

use super::newtypes::ResolutionHandle;

/// Lifecycle state of the cloud connection, as seen by the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection attempt has been made (or the last one was torn down)
    #[default]
    Disconnected,
    /// A connection attempt is in flight; at most one at a time
    Connecting,
    /// The connection is established; uploads and folder picks may proceed
    Connected,
    /// The last attempt failed with the recorded reason
    Failed(String),
}

impl ConnectionState {
    /// Returns true if an upload or folder pick may proceed
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Returns true if a new connection attempt may be started
    ///
    /// `Connecting` returns false: issuing Start while an attempt is in
    /// flight must not create a second concurrent connection.
    pub fn can_attempt(&self) -> bool {
        !matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Failure details reported by the connection adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionFailure {
    /// Human-readable failure description
    pub reason: String,
    /// Present when the failure can be remedied through a resolution flow
    pub resolution: Option<ResolutionHandle>,
}

impl ConnectionFailure {
    /// A failure that a resolution flow can remedy
    pub fn recoverable(reason: impl Into<String>, handle: ResolutionHandle) -> Self {
        Self {
            reason: reason.into(),
            resolution: Some(handle),
        }
    }

    /// A failure with no remedy; the attempt terminates
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            resolution: None,
        }
    }

    /// Returns true when a resolution handle is available
    pub fn has_resolution(&self) -> bool {
        self.resolution.is_some()
    }
}

/// Events delivered by the connection adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionEvent {
    /// The connection is now established
    Connected,
    /// The connection was lost temporarily; the platform re-triggers
    Suspended(i32),
    /// The connection attempt failed
    Failed(ConnectionFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(ConnectionState::Disconnected.can_attempt());
        assert!(ConnectionState::Failed("boom".to_string()).can_attempt());
        assert!(!ConnectionState::Connecting.can_attempt());
        assert!(!ConnectionState::Connected.can_attempt());

        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "disconnected");
        assert_eq!(
            ConnectionState::Failed("token revoked".to_string()).to_string(),
            "failed: token revoked"
        );
    }

    #[test]
    fn test_failure_constructors() {
        let fatal = ConnectionFailure::fatal("network unreachable");
        assert!(!fatal.has_resolution());

        let handle = ResolutionHandle::new("https://example.com/consent");
        let recoverable = ConnectionFailure::recoverable("consent required", handle.clone());
        assert!(recoverable.has_resolution());
        assert_eq!(recoverable.resolution, Some(handle));
    }
}
