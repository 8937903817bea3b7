//! Wiring of the feed components for one UI context.

use std::sync::Arc;

use crate::config::FeedConfig;
use crate::notification::NotificationController;
use crate::remote::{HttpWishClient, WishTransport};
use crate::store::WishStore;
use crate::submission::SubmissionController;
use crate::sync::{FeedSynchronizer, PollHandle};
use crate::ticker::TickerCache;
use crate::Result;

/// Owns the store and every component that reads or writes it.
///
/// All components share the same `WishStore`. Polling only runs while the
/// handle returned by [`WishFeed::start`] is alive.
#[derive(Clone)]
pub struct WishFeed {
    store: WishStore,
    notifications: NotificationController,
    submissions: SubmissionController,
    synchronizer: FeedSynchronizer,
}

impl WishFeed {
    pub fn new(transport: Arc<dyn WishTransport>, config: &FeedConfig) -> Self {
        let store = WishStore::new();
        let notifications = NotificationController::new(config.notification_ttl);
        let submissions =
            SubmissionController::new(transport.clone(), store.clone(), notifications.clone());
        let synchronizer = FeedSynchronizer::from_config(transport, store.clone(), config);
        Self {
            store,
            notifications,
            submissions,
            synchronizer,
        }
    }

    /// Feed talking HTTP to the configured remote store
    pub fn connect(config: &FeedConfig) -> Result<Self> {
        let client = HttpWishClient::from_config(config)?;
        tracing::debug!("Using wish store at {}", client.base_url());
        Ok(Self::new(Arc::new(client), config))
    }

    /// Begin periodic polling; stop or drop the handle on teardown
    #[must_use]
    pub fn start(&self) -> PollHandle {
        self.synchronizer.spawn()
    }

    #[must_use]
    pub const fn store(&self) -> &WishStore {
        &self.store
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationController {
        &self.notifications
    }

    #[must_use]
    pub const fn submissions(&self) -> &SubmissionController {
        &self.submissions
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &FeedSynchronizer {
        &self.synchronizer
    }

    #[must_use]
    pub fn ticker(&self) -> TickerCache {
        TickerCache::new(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::remote::{HttpReply, TransportError};
    use crate::testing::ScriptedTransport;

    #[tokio::test(start_paused = true)]
    async fn components_share_one_store() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_create(Err(TransportError::Timeout));
        transport.push_list(Ok(HttpReply::new(
            200,
            r#"[{"id":1,"name":"Bob","message":"Cheers","createdAt":"2025-01-01T00:00:00Z"}]"#,
        )));
        let config = FeedConfig::new("http://localhost:8080").unwrap();
        let feed = WishFeed::new(transport.clone(), &config);

        feed.submissions().submit("Anna", "Congrats!").await.unwrap();
        feed.synchronizer().poll().await.unwrap();

        let snapshot = feed.store().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].is_provisional());
        assert!(feed.notifications().current().is_some());

        tokio::time::sleep(config.notification_ttl + Duration::from_millis(1)).await;
        assert!(feed.notifications().current().is_none());
    }

    #[tokio::test]
    async fn connect_uses_configured_base_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/wishes")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let config = FeedConfig::new(server.url()).unwrap();

        let feed = WishFeed::connect(&config).unwrap();
        let summary = feed.synchronizer().poll().await.unwrap();

        assert_eq!(summary.inserted, 0);
        mock.assert_async().await;
    }
}
