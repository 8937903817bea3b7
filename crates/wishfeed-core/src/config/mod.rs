//! Runtime configuration for Wishfeed clients.
//!
//! Values come from the process environment. Parsing goes through a lookup
//! closure so tests never touch real environment variables.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_RECONCILE_TOLERANCE_SECS: u64 = 60;
pub const DEFAULT_NOTIFICATION_SECS: u64 = 3;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Base URL of the remote wish store, without trailing slash
    pub api_base_url: String,
    pub poll_interval: Duration,
    /// Max distance between a provisional record and its confirmed copy
    pub reconcile_tolerance: Duration,
    pub notification_ttl: Duration,
    pub http_timeout: Duration,
}

impl FeedConfig {
    /// Configuration with default timings for the given base URL
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url.into())?,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            reconcile_tolerance: Duration::from_secs(DEFAULT_RECONCILE_TOLERANCE_SECS),
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = normalize_text_option(lookup("WISHFEED_API_URL"))
            .ok_or(ConfigError::MissingVar("WISHFEED_API_URL"))?;

        let poll_interval = seconds_in_range(
            &lookup,
            "WISHFEED_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
            5..=3_600,
        )?;
        let reconcile_tolerance = seconds_in_range(
            &lookup,
            "WISHFEED_RECONCILE_TOLERANCE_SECS",
            DEFAULT_RECONCILE_TOLERANCE_SECS,
            1..=600,
        )?;
        let notification_ttl = seconds_in_range(
            &lookup,
            "WISHFEED_NOTIFICATION_SECS",
            DEFAULT_NOTIFICATION_SECS,
            1..=60,
        )?;
        let http_timeout = seconds_in_range(
            &lookup,
            "WISHFEED_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
            1..=120,
        )?;

        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            poll_interval,
            reconcile_tolerance,
            notification_ttl,
            http_timeout,
        })
    }

    /// Replace the base URL, e.g. from a command-line flag
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(url.into())?;
        Ok(self)
    }

    /// Tolerance as a signed time delta for timestamp comparisons
    pub fn reconcile_tolerance_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.reconcile_tolerance)
            .unwrap_or_else(|_| chrono::Duration::seconds(60))
    }
}

fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let url = normalize_text_option(Some(raw))
        .ok_or_else(|| ConfigError::Invalid("API base URL must not be empty".to_string()))?;
    if !is_http_url(&url) {
        return Err(ConfigError::Invalid(
            "WISHFEED_API_URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn seconds_in_range(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    range: std::ops::RangeInclusive<u64>,
) -> Result<Duration, ConfigError> {
    let Some(raw) = normalize_text_option(lookup(name)) else {
        return Ok(Duration::from_secs(default));
    };
    let secs = raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "{name} must be an integer in [{}, {}]",
            range.start(),
            range.end()
        ))
    })?;
    if !range.contains(&secs) {
        return Err(ConfigError::Invalid(format!(
            "{name} must be in [{}, {}]",
            range.start(),
            range.end()
        )));
    }
    Ok(Duration::from_secs(secs))
}
