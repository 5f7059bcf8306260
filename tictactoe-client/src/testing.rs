//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::core::error::TransportError;
use crate::network::transport::Transport;

type Reply = Result<Value, TransportError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// One request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Replays scripted replies, matched by URL suffix, in FIFO order.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply for `path`.
    pub fn reply(&self, path: &str, reply: Reply) {
        self.push(path, Scripted::Ready(reply));
    }

    /// Queue a reply for `path` that is held back until the returned sender
    /// fires.
    pub fn defer(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Scripted::Deferred(rx));
        tx
    }

    /// Every request seen so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests whose URL ends with `path`.
    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.url.ends_with(path))
            .collect()
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }

    async fn respond(&self, method: &'static str, url: &str, body: Option<Value>) -> Reply {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            body,
        });

        let next = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts
                .iter_mut()
                .find(|(path, _)| url.ends_with(path.as_str()))
                .and_then(|(_, queue)| queue.pop_front())
        };

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Connection("reply dropped".into()))),
            None => Err(TransportError::Connection(format!("no scripted reply for {}", url))),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportError> {
        self.respond("GET", url, None).await
    }

    async fn post(&self, url: &str, body: Value) -> Result<Value, TransportError> {
        self.respond("POST", url, Some(body)).await
    }
}
