//! Wish model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::util::comparable_text;

/// Identifier of a wish.
///
/// Remote ids are issued by the store on confirmation. Provisional ids are
/// UUID v7 values minted at submission time, so they sort by creation and
/// can never collide with a remote id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WishId {
    Remote(String),
    Provisional(Uuid),
}

impl WishId {
    /// Mint a new locally generated id
    #[must_use]
    pub fn provisional() -> Self {
        Self::Provisional(Uuid::now_v7())
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(id) => write!(f, "{id}"),
            Self::Provisional(id) => write!(f, "local-{id}"),
        }
    }
}

/// Whether the remote store has acknowledged a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WishOrigin {
    Confirmed,
    Provisional,
}

/// Validated submission input: both fields trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishDraft {
    pub name: String,
    pub message: String,
}

impl WishDraft {
    /// Trim both fields, returning the name of the first empty one as error
    pub fn new(name: &str, message: &str) -> Result<Self, &'static str> {
        let name = name.trim();
        if name.is_empty() {
            return Err("name");
        }
        let message = message.trim();
        if message.is_empty() {
            return Err("message");
        }
        Ok(Self {
            name: name.to_string(),
            message: message.to_string(),
        })
    }
}

/// One guestbook entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishRecord {
    pub id: WishId,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub origin: WishOrigin,
}

impl WishRecord {
    /// A record acknowledged by the remote store
    #[must_use]
    pub fn confirmed(
        id: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: WishId::Remote(id.into()),
            name: name.into(),
            message: message.into(),
            created_at,
            origin: WishOrigin::Confirmed,
        }
    }

    /// A record inserted locally without a positive acknowledgment
    #[must_use]
    pub fn provisional(draft: &WishDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: WishId::provisional(),
            name: draft.name.clone(),
            message: draft.message.clone(),
            created_at,
            origin: WishOrigin::Provisional,
        }
    }

    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.origin == WishOrigin::Provisional
    }

    /// Whether `other` plausibly represents the same submission.
    ///
    /// Compares store-normalized name and message, and requires the creation
    /// times to lie within `tolerance` of each other.
    #[must_use]
    pub fn same_submission(&self, other: &Self, tolerance: chrono::Duration) -> bool {
        self.time_distance(other) <= tolerance
            && comparable_text(&self.name) == comparable_text(&other.name)
            && comparable_text(&self.message) == comparable_text(&other.message)
    }

    #[must_use]
    pub fn time_distance(&self, other: &Self) -> chrono::Duration {
        (self.created_at - other.created_at).abs()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_735_689_600 + secs, 0).unwrap()
    }

    #[test]
    fn test_draft_trims_fields() {
        let draft = WishDraft::new("  Anna ", "\tCongrats!\n").unwrap();
        assert_eq!(draft.name, "Anna");
        assert_eq!(draft.message, "Congrats!");
    }

    #[test]
    fn test_draft_rejects_blank_fields() {
        assert_eq!(WishDraft::new("   ", "hi"), Err("name"));
        assert_eq!(WishDraft::new("Anna", " \n "), Err("message"));
        assert_eq!(WishDraft::new("", ""), Err("name"));
    }

    #[test]
    fn test_provisional_ids_unique() {
        assert_ne!(WishId::provisional(), WishId::provisional());
        assert!(!WishId::provisional().is_remote());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(WishId::Remote("7".to_string()).to_string(), "7");
        assert!(WishId::provisional().to_string().starts_with("local-"));
    }

    #[test]
    fn test_same_submission_within_tolerance() {
        let draft = WishDraft::new("Anna", "Congrats!").unwrap();
        let local = WishRecord::provisional(&draft, at(0));
        let remote = WishRecord::confirmed("7", "Anna", "Congrats!", at(12));

        assert!(local.same_submission(&remote, chrono::Duration::seconds(30)));
        assert!(!local.same_submission(&remote, chrono::Duration::seconds(5)));
    }

    #[test]
    fn test_same_submission_sees_through_escaping() {
        let draft = WishDraft::new("Anna's", "<b>Love</b> & joy").unwrap();
        let local = WishRecord::provisional(&draft, at(0));
        let remote = WishRecord::confirmed("8", "Anna&#39;s", "Love &amp; joy", at(1));

        assert!(local.same_submission(&remote, chrono::Duration::seconds(30)));
    }

    #[test]
    fn test_same_submission_requires_same_text() {
        let draft = WishDraft::new("Anna", "Congrats!").unwrap();
        let local = WishRecord::provisional(&draft, at(0));
        let other = WishRecord::confirmed("9", "Anna", "Congrats!!", at(0));

        assert!(!local.same_submission(&other, chrono::Duration::seconds(30)));
    }

    #[test]
    fn test_record_serializes_for_output() {
        let record = WishRecord::confirmed("7", "Anna", "Congrats!", at(0));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": {"kind": "remote", "value": "7"},
                "name": "Anna",
                "message": "Congrats!",
                "created_at": "2025-01-01T00:00:00Z",
                "origin": "confirmed",
            })
        );
    }
}
