//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::models::WishDraft;
use crate::remote::{HttpReply, TransportError, WishTransport};

type Reply = Result<HttpReply, TransportError>;

/// Transport answering from queued replies.
///
/// An empty list queue answers `200 []`; an empty create queue answers with a
/// timeout.
#[derive(Default)]
pub struct ScriptedTransport {
    lists: Mutex<VecDeque<Reply>>,
    creates: Mutex<VecDeque<Reply>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    created: Mutex<Vec<WishDraft>>,
}

impl ScriptedTransport {
    pub fn push_list(&self, reply: Reply) {
        self.lists.lock().unwrap().push_back(reply);
    }

    pub fn push_create(&self, reply: Reply) {
        self.creates.lock().unwrap().push_back(reply);
    }

    /// Hold the next create request until the returned sender fires
    pub fn hold_next_create(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.create_gate.lock().unwrap() = Some(gate);
        release
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<WishDraft> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl WishTransport for ScriptedTransport {
    async fn list_wishes(&self) -> Reply {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpReply::new(200, "[]")))
    }

    async fn create_wish(&self, draft: &WishDraft) -> Reply {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(draft.clone());

        let gate = self.create_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Timeout))
    }
}
