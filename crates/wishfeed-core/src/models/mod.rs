//! Data models for Wishfeed

mod wish;

pub use wish::{WishDraft, WishId, WishOrigin, WishRecord};
