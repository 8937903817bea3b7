//! Single-slot transient status notifications.
//!
//! At most one notification is visible. Showing a new one replaces the
//! current one and restarts the auto-dismiss timer; nothing is queued.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_NOTIFICATION_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Increases with every `show`
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

struct Inner {
    ttl: Duration,
    slot: watch::Sender<Option<Notification>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl Inner {
    fn cancel_timer(&self) {
        let previous = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

/// Cloneable handle to the notification slot
#[derive(Clone)]
pub struct NotificationController {
    inner: Arc<Inner>,
}

impl Default for NotificationController {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_NOTIFICATION_SECS))
    }
}

impl NotificationController {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                ttl,
                slot,
                timer: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Show `message`, replacing whatever is visible.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
        };

        let mut timer = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        tracing::debug!("Notification #{id} ({kind}): {}", notification.message);
        self.inner.slot.send_replace(Some(notification));
        *timer = Some(spawn_expiry(Arc::downgrade(&self.inner), self.inner.ttl, id));
        id
    }

    /// Hide the visible notification, if any
    pub fn dismiss(&self) {
        self.inner.cancel_timer();
        self.inner
            .slot
            .send_if_modified(|current| current.take().is_some());
    }

    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.inner.slot.borrow().clone()
    }

    /// Receive every change of the visible notification
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.slot.subscribe()
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }
}

fn spawn_expiry(inner: Weak<Inner>, ttl: Duration, id: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Some(inner) = inner.upgrade() {
            inner.slot.send_if_modified(|current| {
                if current.as_ref().is_some_and(|shown| shown.id == id) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        }
    })
}
