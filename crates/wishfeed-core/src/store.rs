//! In-memory feed store.
//!
//! `WishStore` is the single source of truth for what the feed renders. It is
//! a cheap cloneable handle; every clone sees the same records. Each mutation
//! happens under one write lock, so a `snapshot()` never observes a
//! half-applied change.

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::WishRecord;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<WishRecord>,
    version: u64,
}

/// Ordered (most recent first) collection of wish records
#[derive(Debug, Clone, Default)]
pub struct WishStore {
    inner: Arc<RwLock<Inner>>,
}

impl WishStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a record at the head of the feed
    pub fn insert_at_head(&self, record: WishRecord) {
        self.mutate(|records| {
            records.insert(0, record);
            ((), true)
        });
    }

    /// Place a record at the head, dropping any other copy with the same id.
    ///
    /// A poll may have delivered the record while its submission was still
    /// in flight; the submission result then moves it to the head.
    pub fn upsert_at_head(&self, record: WishRecord) {
        self.mutate(|records| {
            records.retain(|existing| existing.id != record.id);
            records.insert(0, record);
            ((), true)
        });
    }

    /// Replace the first record matching `matcher` in place.
    ///
    /// Returns `false` and leaves the store untouched when nothing matches.
    pub fn replace(&self, matcher: impl Fn(&WishRecord) -> bool, record: WishRecord) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(slot) = guard.records.iter_mut().find(|existing| matcher(existing)) else {
            return false;
        };
        *slot = record;
        guard.version += 1;
        true
    }

    /// Read-only copy of the current feed, most recent first
    #[must_use]
    pub fn snapshot(&self) -> Vec<WishRecord> {
        self.read().records.clone()
    }

    /// Monotonic counter bumped by every mutation.
    ///
    /// Derived views compare it against the value they were built from.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.read().version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a multi-step change atomically.
    ///
    /// `change` reports whether it altered the records; only then is the
    /// version bumped.
    pub(crate) fn mutate<R>(&self, change: impl FnOnce(&mut Vec<WishRecord>) -> (R, bool)) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let (result, changed) = change(&mut guard.records);
        if changed {
            guard.version += 1;
        }
        result
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
