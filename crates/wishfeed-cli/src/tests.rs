use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use wishfeed_core::config::FeedConfig;
use wishfeed_core::{Notification, NotificationKind, WishDraft, WishFeed, WishRecord};

use crate::commands::common::{
    format_notification, format_relative_time, format_wish_lines, load_config, load_config_from,
    preview, resolve_message, wish_to_list_item,
};
use crate::commands::watch::{handle_line, parse_wish_line};
use crate::error::CliError;

fn lookup_from(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let vars = vars.to_vec();
    move |key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn format_relative_time_units() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time(now - Duration::seconds(30), now), "just now");
    assert_eq!(format_relative_time(now - Duration::minutes(2), now), "2m ago");
    assert_eq!(format_relative_time(now - Duration::hours(2), now), "2h ago");
    assert_eq!(format_relative_time(now - Duration::days(3), now), "3d ago");
    assert_eq!(format_relative_time(now - Duration::days(400), now), "1y ago");
}

#[test]
fn format_relative_time_clamps_future_timestamps() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(format_relative_time(now + Duration::minutes(5), now), "just now");
}

#[test]
fn preview_truncates_and_collapses_whitespace() {
    assert_eq!(preview("Congrats\n  to you  both", 40), "Congrats to you both");
    assert_eq!(preview("abcdefghij", 6), "abc...");
}

#[test]
fn wish_lines_mark_provisional_records() {
    let draft = WishDraft::new("Anna", "Congrats!").unwrap();
    let records = vec![
        WishRecord::provisional(&draft, Utc::now()),
        WishRecord::confirmed("7", "Bob", "Cheers", Utc::now()),
    ];

    let lines = format_wish_lines(&records);

    assert!(lines[0].starts_with("* Anna"));
    assert!(lines[1].starts_with("  Bob"));
    assert!(lines[1].contains("just now"));
}

#[test]
fn list_item_serializes_origin() {
    let record = WishRecord::confirmed(
        "7",
        "Anna",
        "Congrats!",
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    );
    let json = serde_json::to_value(wish_to_list_item(&record)).unwrap();

    assert_eq!(json["id"], "7");
    assert_eq!(json["origin"], "confirmed");
    assert_eq!(json["created_at"], "2025-01-01T00:00:00+00:00");
}

#[test]
fn notification_lines_carry_kind_label() {
    let notification = Notification {
        id: 1,
        message: "message too long".to_string(),
        kind: NotificationKind::Error,
    };
    assert_eq!(format_notification(&notification), "[error] message too long");
}

#[test]
fn parse_wish_line_splits_on_first_colon() {
    assert_eq!(
        parse_wish_line("Anna: Congrats: both of you!"),
        Some(("Anna".to_string(), "Congrats: both of you!".to_string()))
    );
    assert_eq!(parse_wish_line("no separator"), None);
}

#[test]
fn resolve_message_joins_words() {
    let parts = vec!["Congrats".to_string(), "you two!".to_string()];
    assert_eq!(resolve_message(&parts), "Congrats you two!");
}

#[test]
fn load_config_accepts_flag_url() {
    let config = load_config(Some("https://wishes.example.com/".to_string())).unwrap();
    assert_eq!(config.api_base_url, "https://wishes.example.com");
}

#[test]
fn flag_url_stands_in_for_missing_env_url() {
    let config = load_config_from(
        Some("http://localhost:8080".to_string()),
        lookup_from(&[("WISHFEED_POLL_INTERVAL_SECS", "45")]),
    )
    .unwrap();
    assert_eq!(config.api_base_url, "http://localhost:8080");
    assert_eq!(config.poll_interval, std::time::Duration::from_secs(45));
}

#[test]
fn flag_url_does_not_hide_invalid_settings() {
    let error = load_config_from(
        Some("http://localhost:8080".to_string()),
        lookup_from(&[("WISHFEED_POLL_INTERVAL_SECS", "1")]),
    )
    .unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
    assert!(error.to_string().contains("WISHFEED_POLL_INTERVAL_SECS"));
}

#[test]
fn flag_url_overrides_env_url() {
    let config = load_config_from(
        Some("https://override.example.com".to_string()),
        lookup_from(&[("WISHFEED_API_URL", "http://localhost:8080")]),
    )
    .unwrap();
    assert_eq!(config.api_base_url, "https://override.example.com");
}

#[tokio::test]
async fn empty_line_dismisses_notification() {
    let feed = WishFeed::connect(&FeedConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
    feed.notifications().show("Thank you!", NotificationKind::Success);

    handle_line(&feed, "   ");

    assert!(feed.notifications().current().is_none());
}
