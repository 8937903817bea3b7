//! Remote wish store collaborator.
//!
//! The transport moves bytes and status codes only. Deciding what a reply
//! means is left to the synchronizer and the submission controller.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::FeedConfig;
use crate::models::WishDraft;

pub use wire::{parse_created_wish, parse_error_text, parse_timestamp, parse_wish_list};

pub const LIST_PATH: &str = "/api/wishes";
pub const CREATE_PATH: &str = "/api/wish";

/// Raw reply from the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// `None` when the body could not be read
    pub body: Option<String>,
}

impl HttpReply {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The request failed before any response was obtainable
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to build HTTP client: {0}")]
pub struct HttpError(#[from] reqwest::Error);

/// Requests understood by the remote wish store
#[async_trait]
pub trait WishTransport: Send + Sync {
    /// Fetch every stored wish
    async fn list_wishes(&self) -> Result<HttpReply, TransportError>;

    /// Store a new wish
    async fn create_wish(&self, draft: &WishDraft) -> Result<HttpReply, TransportError>;
}

/// `reqwest` implementation of [`WishTransport`]
#[derive(Clone)]
pub struct HttpWishClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpWishClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self, HttpError> {
        Self::new(&config.api_base_url, config.http_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl WishTransport for HttpWishClient {
    async fn list_wishes(&self) -> Result<HttpReply, TransportError> {
        let url = self.url(LIST_PATH);
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Ok(read_reply(response).await)
    }

    async fn create_wish(&self, draft: &WishDraft) -> Result<HttpReply, TransportError> {
        let url = self.url(CREATE_PATH);
        tracing::debug!("POST {url} (name: {})", draft.name);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(draft)
            .send()
            .await?;
        Ok(read_reply(response).await)
    }
}

async fn read_reply(response: reqwest::Response) -> HttpReply {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => Some(body),
        Err(error) => {
            tracing::warn!("Failed to read response body (HTTP {status}): {error}");
            None
        }
    };
    HttpReply { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> WishDraft {
        WishDraft::new("Anna", "Congrats!").unwrap()
    }

    #[tokio::test]
    async fn create_wish_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/wish")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "name": "Anna",
                "message": "Congrats!"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":7,"name":"Anna","message":"Congrats!","created_at":"2025-01-01T00:00:00Z"}"#)
            .create_async()
            .await;

        let client = HttpWishClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let reply = client.create_wish(&draft()).await.unwrap();

        assert_eq!(reply.status, 201);
        assert!(reply.is_success());
        assert!(reply.body.unwrap().contains("\"id\":7"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_wishes_passes_error_status_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/wishes")
            .with_status(500)
            .with_body(r#"{"error":"db down"}"#)
            .create_async()
            .await;

        let client = HttpWishClient::new(format!("{}/", server.url()), Duration::from_secs(5))
            .unwrap();
        let reply = client.list_wishes().await.unwrap();

        assert_eq!(reply, HttpReply::new(500, r#"{"error":"db down"}"#));
        assert!(!reply.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_store_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = HttpWishClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let error = client.list_wishes().await.unwrap_err();

        assert!(matches!(
            error,
            TransportError::Connect(_) | TransportError::Request(_) | TransportError::Timeout
        ));
    }

    #[test]
    fn base_url_is_trimmed() {
        let client = HttpWishClient::new("https://wishes.example.com///", Duration::from_secs(1))
            .unwrap();
        assert_eq!(client.base_url(), "https://wishes.example.com");
        assert_eq!(client.url(LIST_PATH), "https://wishes.example.com/api/wishes");
    }
}
