//! Scrolling ticker text derived from the feed.

use crate::models::WishRecord;
use crate::store::WishStore;

pub const SEPARATOR: &str = " • ";
pub const EMPTY_TICKER: &str = "Be the first to leave a wish!";

/// Render messages of `records` as one ticker line
#[must_use]
pub fn render_ticker(records: &[WishRecord]) -> String {
    if records.is_empty() {
        return EMPTY_TICKER.to_string();
    }
    let body = records
        .iter()
        .map(|record| record.message.trim())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    format!("...{SEPARATOR}{body}{SEPARATOR}...")
}

/// Ticker text rebuilt only when the store changed
#[derive(Debug)]
pub struct TickerCache {
    store: WishStore,
    built_from: Option<u64>,
    text: String,
}

impl TickerCache {
    #[must_use]
    pub fn new(store: WishStore) -> Self {
        Self {
            store,
            built_from: None,
            text: String::new(),
        }
    }

    /// Current text, recomputed from a fresh snapshot if stale
    pub fn text(&mut self) -> &str {
        let version = self.store.version();
        if self.built_from != Some(version) {
            self.text = render_ticker(&self.store.snapshot());
            self.built_from = Some(version);
        }
        &self.text
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.built_from != Some(self.store.version())
    }
}
