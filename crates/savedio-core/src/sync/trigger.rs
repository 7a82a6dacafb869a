//! Deciding when a reconciliation runs.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{Reconciler, RemoteBookmarkSource, SyncOutcome, SyncReporter};
use crate::db::BookmarkStore;
use crate::util::unix_millis_now;

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Result of a trigger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A reconciliation ran to the given outcome
    Ran(SyncOutcome),
    /// The last successful sync is recent enough
    Fresh { last_sync: i64 },
    /// Another reconciliation was in flight; nothing was done
    AlreadyRunning,
}

/// Single-flight entry point to a [`Reconciler`].
///
/// Built once by the application and shared; at most one reconciliation
/// runs at a time and overlapping calls return immediately.
pub struct SyncTrigger<R, S, P> {
    reconciler: Reconciler<R, S, P>,
    in_flight: Mutex<()>,
}

impl<R, S, P> SyncTrigger<R, S, P>
where
    R: RemoteBookmarkSource,
    S: BookmarkStore,
    P: SyncReporter,
{
    pub fn new(reconciler: Reconciler<R, S, P>) -> Self {
        Self {
            reconciler,
            in_flight: Mutex::new(()),
        }
    }

    pub const fn reconciler(&self) -> &Reconciler<R, S, P> {
        &self.reconciler
    }

    /// Reconcile now, unless a reconciliation is already running.
    pub async fn trigger_immediate(&self, cancel: &CancellationToken) -> TriggerOutcome {
        let Ok(_running) = self.in_flight.try_lock() else {
            tracing::debug!("Synchronization already in flight");
            return TriggerOutcome::AlreadyRunning;
        };
        TriggerOutcome::Ran(self.reconciler.reconcile(cancel).await)
    }

    /// Reconcile when the last successful sync is older than `max_age`.
    pub async fn trigger_if_stale(
        &self,
        max_age: Duration,
        cancel: &CancellationToken,
    ) -> TriggerOutcome {
        let Ok(_running) = self.in_flight.try_lock() else {
            tracing::debug!("Synchronization already in flight");
            return TriggerOutcome::AlreadyRunning;
        };

        let last_sync = match self.reconciler.store().read_last_sync_time().await {
            Ok(last_sync) => last_sync,
            Err(error) => {
                tracing::warn!("Failed to read last sync time: {error}");
                0
            }
        };
        if !is_stale(last_sync, unix_millis_now(), max_age) {
            tracing::debug!(last_sync, "Bookmarks are fresh, skipping synchronization");
            return TriggerOutcome::Fresh { last_sync };
        }

        TriggerOutcome::Ran(self.reconciler.reconcile(cancel).await)
    }
}

fn is_stale(last_sync: i64, now: i64, max_age: Duration) -> bool {
    let max_age = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(last_sync) > max_age
}

/// Periodic synchronization window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSchedule {
    /// Maximum age of the local copy
    pub interval: Duration,
    /// Extra time a check may be postponed
    pub flex: Duration,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self {
            interval: 24 * HOUR,
            flex: 8 * HOUR,
        }
    }
}

impl SyncSchedule {
    /// How long to wait before the next check after `outcome`.
    pub fn next_delay(&self, outcome: &TriggerOutcome, now: i64) -> Duration {
        match outcome {
            TriggerOutcome::Fresh { last_sync } => {
                let elapsed = u64::try_from(now.saturating_sub(*last_sync)).unwrap_or(0);
                let remaining = self
                    .interval
                    .saturating_sub(Duration::from_millis(elapsed));
                (remaining + Duration::from_secs(1)).min(self.interval + self.flex)
            }
            TriggerOutcome::AlreadyRunning => self.flex,
            TriggerOutcome::Ran(_) => self.interval,
        }
    }
}

/// Keep the local copy fresh until `cancel` fires.
pub async fn run_periodic<R, S, P>(
    trigger: &SyncTrigger<R, S, P>,
    schedule: SyncSchedule,
    cancel: &CancellationToken,
) where
    R: RemoteBookmarkSource,
    S: BookmarkStore,
    P: SyncReporter,
{
    tracing::info!(
        interval_secs = schedule.interval.as_secs(),
        flex_secs = schedule.flex.as_secs(),
        "Starting periodic synchronization"
    );

    loop {
        let outcome = trigger.trigger_if_stale(schedule.interval, cancel).await;
        if cancel.is_cancelled() {
            break;
        }

        let delay = schedule.next_delay(&outcome, unix_millis_now());
        tracing::info!("Next synchronization check in {}s", delay.as_secs());
        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    tracing::info!("Periodic synchronization stopped");
}
