//! Cloud connection port (driven/secondary port)
//!
//! The connection lifecycle is asynchronous: `connect()` only *initiates*
//! an attempt, and completion arrives as a
//! [`ConnectionEvent`](crate::domain::connection::ConnectionEvent) pushed
//! into the orchestrator's event channel (the adapter receives the sender
//! at construction time). The orchestrator never polls or blocks on the
//! connection.
//!
//! A connection object is bound to one account; switching accounts requires
//! a new connection.

/// Port trait for the async cloud connection lifecycle
#[async_trait::async_trait]
pub trait ICloudConnection: Send + Sync {
    /// Initiates a connection attempt
    ///
    /// Returns once the attempt has been started; the outcome is delivered
    /// as a `ConnectionEvent`. Calling this while an attempt is already in
    /// flight is the caller's bug — the orchestrator guards against it via
    /// its `Connecting` state.
    async fn connect(&self) -> anyhow::Result<()>;

    /// Returns whether the connection is currently established
    fn is_connected(&self) -> bool;
}
