//! JSON wire format of the remote wish store.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::models::WishRecord;
use crate::util::{compact_text, normalize_text_option};

pub(crate) const GENERIC_ERROR: &str = "Something went wrong, please try again";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RemoteWish {
    id: RawId,
    name: String,
    message: String,
    #[serde(rename = "createdAt", alias = "created_at")]
    created_at: String,
}

impl TryFrom<RemoteWish> for WishRecord {
    type Error = String;

    fn try_from(value: RemoteWish) -> Result<Self, Self::Error> {
        let id = match value.id {
            RawId::Number(id) => id.to_string(),
            RawId::Text(id) => {
                normalize_text_option(Some(id)).ok_or_else(|| "blank id".to_string())?
            }
        };
        if value.name.trim().is_empty() || value.message.trim().is_empty() {
            return Err(format!("wish {id} has a blank name or message"));
        }
        let created_at = parse_timestamp(&value.created_at)
            .ok_or_else(|| format!("wish {id} has unreadable timestamp '{}'", value.created_at))?;

        Ok(Self::confirmed(id, value.name, value.message, created_at))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Parse a store timestamp.
///
/// Accepts RFC 3339, PostgreSQL text output (`2025-01-01 10:00:00.5+00`), and
/// offset-less timestamps, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Parse the canonical list, sorted most recent first.
///
/// A `null` body is an empty list. Entries that cannot be normalised are
/// dropped with a warning; a body that is not a list is an error.
pub fn parse_wish_list(body: &str) -> Result<Vec<WishRecord>, String> {
    let raw: Option<Vec<serde_json::Value>> =
        serde_json::from_str(body).map_err(|error| format!("invalid wish list JSON: {error}"))?;

    let mut records: Vec<WishRecord> = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| {
            let record = serde_json::from_value::<RemoteWish>(value)
                .map_err(|error| error.to_string())
                .and_then(WishRecord::try_from);
            match record {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::warn!("Dropping malformed wish from feed: {reason}");
                    None
                }
            }
        })
        .collect();

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(records)
}

/// Parse the body of a successful creation reply
pub fn parse_created_wish(body: &str) -> Result<WishRecord, String> {
    let remote: RemoteWish =
        serde_json::from_str(body).map_err(|error| format!("invalid wish JSON: {error}"))?;
    WishRecord::try_from(remote)
}

/// Best available error text from a rejection body
pub fn parse_error_text(body: Option<&str>) -> String {
    let Some(body) = body.map(str::trim).filter(|body| !body.is_empty()) else {
        return GENERIC_ERROR.to_string();
    };

    if let Ok(payload) = serde_json::from_str::<ErrorBody>(body) {
        return normalize_text_option(payload.error.or(payload.message))
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
    }

    let looks_structured = body.starts_with('{') || body.starts_with('[') || body.starts_with('<');
    if looks_structured {
        GENERIC_ERROR.to_string()
    } else {
        compact_text(body)
    }
}
