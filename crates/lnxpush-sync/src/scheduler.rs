//! Periodic sync scheduling
//!
//! The [`PeriodicScheduler`] emits one periodic [`SyncTrigger`] per interval
//! into the orchestrator's trigger channel, at a uniformly random point
//! inside the flex window. The [`ScheduleHandle`] is the shared on/off
//! switch the [`SyncService`](super::service::SyncService) flips when sync
//! is initialized or cancelled.
//!
//! ## Flow
//!
//! ```text
//! PeriodicScheduler ──→ mpsc::Sender<SyncTrigger> ──→ SyncOrchestrator
//!         │
//!   ScheduleHandle (enabled flag, shared with SyncService)
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lnxpush_core::domain::trigger::SyncTrigger;

/// One sync per day
pub const SYNC_INTERVAL: Duration = Duration::from_secs(86_400);

/// Tolerance the scheduler has in firing a periodic trigger
pub const SYNC_FLEX: Duration = Duration::from_secs(SYNC_INTERVAL.as_secs() / 3);

/// Shared registration flag for the periodic schedule
///
/// `enable()` is idempotent; re-registering an already-installed schedule
/// is a no-op, so `initialize_sync` can be called repeatedly without
/// stacking registrations.
#[derive(Debug, Default)]
pub struct ScheduleHandle {
    enabled: AtomicBool,
}

impl ScheduleHandle {
    /// Creates a handle with the schedule not yet installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the periodic schedule
    ///
    /// Returns `true` if the schedule was newly installed, `false` if it
    /// was already active.
    pub fn enable(&self) -> bool {
        !self.enabled.swap(true, Ordering::AcqRel)
    }

    /// Removes the periodic schedule
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Returns whether the periodic schedule is installed
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Emits periodic sync triggers while the schedule is enabled
///
/// Each cycle sleeps `interval - flex` plus a uniformly random offset
/// within the flex window, so consecutive runs land somewhere inside
/// `[interval - flex, interval]` after the previous one. A disabled
/// schedule skips the tick without firing.
pub struct PeriodicScheduler {
    trigger_tx: mpsc::Sender<SyncTrigger>,
    handle: Arc<ScheduleHandle>,
    shutdown: CancellationToken,
    interval: Duration,
    flex: Duration,
}

impl PeriodicScheduler {
    /// Creates a scheduler with the production cadence (daily, flex 1/3)
    pub fn new(
        trigger_tx: mpsc::Sender<SyncTrigger>,
        handle: Arc<ScheduleHandle>,
        shutdown: CancellationToken,
    ) -> Self {
        Self::with_timing(trigger_tx, handle, shutdown, SYNC_INTERVAL, SYNC_FLEX)
    }

    /// Creates a scheduler with an explicit interval and flex window
    pub fn with_timing(
        trigger_tx: mpsc::Sender<SyncTrigger>,
        handle: Arc<ScheduleHandle>,
        shutdown: CancellationToken,
        interval: Duration,
        flex: Duration,
    ) -> Self {
        assert!(flex <= interval, "flex window cannot exceed the interval");
        Self {
            trigger_tx,
            handle,
            shutdown,
            interval,
            flex,
        }
    }

    /// Main loop: sleep one jittered interval, fire if enabled, repeat
    ///
    /// Terminates when the shutdown token is cancelled or the trigger
    /// channel is closed.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            flex_secs = self.flex.as_secs(),
            "Periodic scheduler starting"
        );

        loop {
            let delay = self.next_delay();
            debug!(delay_secs = delay.as_secs(), "Scheduler sleeping until next window");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received, periodic scheduler stopping");
                    break;
                }
            }

            if !self.handle.is_enabled() {
                debug!("Periodic schedule not installed, skipping tick");
                continue;
            }

            debug!("Emitting periodic sync trigger");
            if self.trigger_tx.send(SyncTrigger::periodic()).await.is_err() {
                warn!("Trigger channel closed, periodic scheduler stopping");
                break;
            }
        }
    }

    /// Picks the next sleep duration inside `[interval - flex, interval]`
    fn next_delay(&self) -> Duration {
        if self.flex.is_zero() {
            return self.interval;
        }
        let jitter = rand::thread_rng().gen_range(0..=self.flex.as_millis() as u64);
        self.interval - self.flex + Duration::from_millis(jitter)
    }
}
