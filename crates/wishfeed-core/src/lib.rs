//! wishfeed-core - Core library for Wishfeed
//!
//! This crate contains the wish model, the in-memory feed store, and the
//! submission, synchronization and notification logic shared by every
//! Wishfeed front end.

pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notification;
pub mod remote;
pub mod state;
pub mod store;
pub mod submission;
pub mod sync;
pub mod ticker;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use feed::WishFeed;
pub use models::{WishDraft, WishId, WishOrigin, WishRecord};
pub use notification::{Notification, NotificationController, NotificationKind};
pub use store::WishStore;
pub use submission::{SubmissionController, SubmitError, SubmitOutcome};
pub use sync::{FeedSynchronizer, PollHandle};
