//! Lifecycle of one outgoing wish.
//!
//! Every transmitted submission ends in exactly one of three outcomes:
//!
//! - **Confirmed**: success status with a readable wish body. The returned
//!   record goes to the head of the feed.
//! - **Rejected**: non-success status. The feed is left alone and the best
//!   available error text is shown.
//! - **Ambiguous**: the request failed before a response arrived, or a
//!   success response could not be read. The wish may well be stored, so a
//!   provisional record goes to the head of the feed; the next successful
//!   poll reconciles it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{WishDraft, WishRecord};
use crate::notification::{NotificationController, NotificationKind};
use crate::remote::{parse_created_wish, parse_error_text, HttpReply, WishTransport};
use crate::store::WishStore;

pub const CONFIRMED_TEXT: &str = "Thank you for your warm wishes!";
pub const UNCONFIRMED_TEXT: &str =
    "Your wish was sent but not confirmed yet; it will appear for everyone shortly";

/// Submission refused before anything was sent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please enter your {0}")]
    Validation(&'static str),
    #[error("A wish is already being sent")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed(WishRecord),
    Rejected { status: u16, reason: String },
    Ambiguous { record: WishRecord, cause: String },
}

impl SubmitOutcome {
    /// The record added to the feed, if any
    #[must_use]
    pub const fn record(&self) -> Option<&WishRecord> {
        match self {
            Self::Confirmed(record) | Self::Ambiguous { record, .. } => Some(record),
            Self::Rejected { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionController {
    transport: Arc<dyn WishTransport>,
    store: WishStore,
    notifications: NotificationController,
    in_flight: Arc<AtomicBool>,
}

impl SubmissionController {
    pub fn new(
        transport: Arc<dyn WishTransport>,
        store: WishStore,
        notifications: NotificationController,
    ) -> Self {
        Self {
            transport,
            store,
            notifications,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Validate and send a wish, then apply the outcome to the feed
    pub async fn submit(&self, name: &str, message: &str) -> Result<SubmitOutcome, SubmitError> {
        let draft = WishDraft::new(name, message).map_err(SubmitError::Validation)?;
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SubmitError::Busy)?;

        tracing::debug!("Sending wish from {}", draft.name);
        let submitted_at = Utc::now();
        let outcome = match self.transport.create_wish(&draft).await {
            Ok(reply) => classify(reply, &draft, submitted_at),
            Err(error) => ambiguous(&draft, submitted_at, error.to_string()),
        };
        self.apply(&outcome);
        Ok(outcome)
    }

    /// Whether a submission is currently in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn apply(&self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Confirmed(record) => {
                tracing::info!("Wish {} confirmed", record.id);
                self.store.upsert_at_head(record.clone());
                self.notifications
                    .show(CONFIRMED_TEXT, NotificationKind::Success);
            }
            SubmitOutcome::Rejected { status, reason } => {
                tracing::info!("Wish rejected (HTTP {status}): {reason}");
                self.notifications
                    .show(reason.clone(), NotificationKind::Error);
            }
            SubmitOutcome::Ambiguous { record, cause } => {
                tracing::warn!("Wish delivery unconfirmed, showing it provisionally: {cause}");
                self.store.insert_at_head(record.clone());
                self.notifications
                    .show(UNCONFIRMED_TEXT, NotificationKind::Info);
            }
        }
    }
}

fn classify(reply: HttpReply, draft: &WishDraft, submitted_at: DateTime<Utc>) -> SubmitOutcome {
    if !reply.is_success() {
        return SubmitOutcome::Rejected {
            status: reply.status,
            reason: parse_error_text(reply.body.as_deref()),
        };
    }
    match reply.body.as_deref().map(parse_created_wish) {
        Some(Ok(record)) => SubmitOutcome::Confirmed(record),
        Some(Err(reason)) => ambiguous(draft, submitted_at, reason),
        None => ambiguous(
            draft,
            submitted_at,
            "response body could not be read".to_string(),
        ),
    }
}

fn ambiguous(draft: &WishDraft, submitted_at: DateTime<Utc>, cause: String) -> SubmitOutcome {
    SubmitOutcome::Ambiguous {
        record: WishRecord::provisional(draft, submitted_at),
        cause,
    }
}

/// Holds the busy flag for the duration of one submission
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
