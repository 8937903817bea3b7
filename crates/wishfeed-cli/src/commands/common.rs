use chrono::{DateTime, Utc};
use serde::Serialize;
use wishfeed_core::config::FeedConfig;
use wishfeed_core::{Notification, NotificationKind, WishFeed, WishOrigin, WishRecord};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct WishListItem {
    pub id: String,
    pub name: String,
    pub message: String,
    pub created_at: String,
    pub relative_time: String,
    pub origin: WishOrigin,
}

/// Environment config, with the `--api-url` flag taking precedence
pub fn load_config(api_url: Option<String>) -> Result<FeedConfig, CliError> {
    load_config_from(api_url, |key| std::env::var(key).ok())
}

/// The flag stands in for `WISHFEED_API_URL`; every other setting is still
/// read and range-checked.
pub fn load_config_from(
    api_url: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<FeedConfig, CliError> {
    let config = match api_url {
        Some(url) => FeedConfig::from_lookup(|key| {
            if key == "WISHFEED_API_URL" {
                Some(url.clone())
            } else {
                lookup(key)
            }
        })?,
        None => FeedConfig::from_lookup(lookup)?,
    };
    Ok(config)
}

/// Connect and pull the canonical list once.
///
/// Unlike background polling, a failed first pull is reported: the command
/// has nothing else to show.
pub async fn load_feed(config: &FeedConfig) -> Result<WishFeed, CliError> {
    let feed = WishFeed::connect(config)?;
    feed.synchronizer().try_poll().await?;
    Ok(feed)
}

pub fn format_wish_lines(records: &[WishRecord]) -> Vec<String> {
    let now = Utc::now();
    records
        .iter()
        .map(|record| {
            let name = preview(&record.name, 16);
            let message = preview(&record.message, 60);
            let relative_time = format_relative_time(record.created_at, now);
            let marker = match record.origin {
                WishOrigin::Confirmed => " ",
                WishOrigin::Provisional => "*",
            };
            format!("{marker} {name:<16}  {message:<60}  {relative_time}")
        })
        .collect()
}

pub fn wish_to_list_item(record: &WishRecord) -> WishListItem {
    WishListItem {
        id: record.id.to_string(),
        name: record.name.clone(),
        message: record.message.clone(),
        created_at: record.created_at.to_rfc3339(),
        relative_time: format_relative_time(record.created_at, Utc::now()),
        origin: record.origin,
    }
}

pub fn format_notification(notification: &Notification) -> String {
    let label = match notification.kind {
        NotificationKind::Info => "note",
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
    };
    format!("[{label}] {}", notification.message)
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Join trailing words of the wish text
pub fn resolve_message(parts: &[String]) -> String {
    parts.join(" ").trim().to_string()
}
