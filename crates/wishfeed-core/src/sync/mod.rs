//! Background feed synchronization.
//!
//! `FeedSynchronizer` pulls the canonical wish list and merges it into the
//! [`WishStore`] without discarding provisional records that the remote
//! store has not confirmed yet. Failures are logged and otherwise ignored;
//! the next scheduled tick simply tries again.

mod reconcile;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::FeedConfig;
use crate::remote::{parse_wish_list, TransportError, WishTransport};
use crate::state::SyncState;
use crate::store::WishStore;

pub use reconcile::{reconcile, PollSummary};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollFailure {
    #[error("wish list request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("wish list endpoint returned HTTP {0}")]
    Status(u16),
    #[error("unreadable wish list: {0}")]
    Payload(String),
}

/// Sync status for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct FeedSynchronizer {
    transport: Arc<dyn WishTransport>,
    store: WishStore,
    tolerance: chrono::Duration,
    interval: Duration,
    status: Arc<watch::Sender<SyncStatus>>,
}

impl FeedSynchronizer {
    pub fn new(
        transport: Arc<dyn WishTransport>,
        store: WishStore,
        tolerance: chrono::Duration,
        interval: Duration,
    ) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            transport,
            store,
            tolerance,
            interval,
            status: Arc::new(status),
        }
    }

    pub fn from_config(
        transport: Arc<dyn WishTransport>,
        store: WishStore,
        config: &FeedConfig,
    ) -> Self {
        Self::new(
            transport,
            store,
            config.reconcile_tolerance_delta(),
            config.poll_interval,
        )
    }

    /// Pull and merge once, swallowing failures.
    ///
    /// Returns `None` when the pull failed; the store is then unchanged.
    pub async fn poll(&self) -> Option<PollSummary> {
        match self.try_poll().await {
            Ok(summary) => Some(summary),
            Err(error) => {
                tracing::warn!("Feed refresh failed, keeping current feed: {error}");
                None
            }
        }
    }

    /// Pull and merge once
    pub async fn try_poll(&self) -> Result<PollSummary, PollFailure> {
        self.status
            .send_modify(|status| status.state = SyncState::Syncing);

        match self.fetch_and_merge().await {
            Ok(summary) => {
                self.status.send_modify(|status| {
                    status.state = SyncState::Synced;
                    status.last_synced_at = Some(Utc::now());
                });
                tracing::debug!(
                    "Feed refreshed: {} reconciled, {} new, {} unchanged",
                    summary.reconciled,
                    summary.inserted,
                    summary.unchanged
                );
                Ok(summary)
            }
            Err(error) => {
                self.status
                    .send_modify(|status| status.state = SyncState::Error);
                Err(error)
            }
        }
    }

    async fn fetch_and_merge(&self) -> Result<PollSummary, PollFailure> {
        let reply = self.transport.list_wishes().await?;
        if !reply.is_success() {
            return Err(PollFailure::Status(reply.status));
        }
        let body = reply
            .body
            .ok_or_else(|| PollFailure::Payload("response body could not be read".to_string()))?;
        let canonical = parse_wish_list(&body).map_err(PollFailure::Payload)?;

        let tolerance = self.tolerance;
        Ok(self
            .store
            .mutate(|records| {
                let summary = reconcile(records, canonical, tolerance);
                (summary, summary.changed())
            }))
    }

    /// Start polling: once immediately, then every interval.
    ///
    /// The schedule runs until the returned handle is stopped or dropped.
    #[must_use]
    pub fn spawn(&self) -> PollHandle {
        let synchronizer = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(synchronizer.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                synchronizer.poll().await;
            }
        });
        tracing::info!("Feed polling started (every {:?})", self.interval);
        PollHandle { task: Some(task) }
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Receive status changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub const fn store(&self) -> &WishStore {
        &self.store
    }
}

/// Owner of the poll schedule. Dropping it cancels the schedule.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Cancel the schedule and wait until the task is gone
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::info!("Feed polling stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
