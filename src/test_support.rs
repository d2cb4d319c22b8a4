//! Shared test doubles used across feature test modules.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use crate::features::content::{ContentPool, ContentSampler};
use crate::features::delivery::{Transport, TransportError};
use crate::features::subscribers::{SubscriberId, SubscriberRegistry, SubscriberStore};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient: SubscriberId,
    pub text: String,
    pub at: tokio::time::Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedMessage {
    pub target: SubscriberId,
    pub source_chat: u64,
    pub message_id: u64,
}

/// Transport that records every call and fails on request.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    forwarded: Mutex<Vec<ForwardedMessage>>,
    attempts: Mutex<HashMap<SubscriberId, usize>>,
    failures: Mutex<HashMap<(SubscriberId, usize), TransportError>>,
    panics: Mutex<HashSet<SubscriberId>>,
    hangs: Mutex<HashSet<SubscriberId>>,
    delays: Mutex<HashMap<(SubscriberId, usize), Duration>>,
    forward_failure: Mutex<Option<TransportError>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the `attempt`-th (1-based) send to `recipient` with `error`
    pub fn fail_send(&self, recipient: SubscriberId, attempt: usize, error: TransportError) {
        self.failures
            .lock()
            .unwrap()
            .insert((recipient, attempt), error);
    }

    /// Panic inside every send to `recipient`
    pub fn panic_for(&self, recipient: SubscriberId) {
        self.panics.lock().unwrap().insert(recipient);
    }

    /// Never complete sends to `recipient`
    pub fn hang_for(&self, recipient: SubscriberId) {
        self.hangs.lock().unwrap().insert(recipient);
    }

    /// Hold the `attempt`-th (1-based) send to `recipient` for `delay` before it lands
    pub fn delay_send(&self, recipient: SubscriberId, attempt: usize, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert((recipient, attempt), delay);
    }

    pub fn fail_forwards(&self, error: TransportError) {
        *self.forward_failure.lock().unwrap() = Some(error);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: SubscriberId) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.recipient == recipient)
            .collect()
    }

    pub fn attempts(&self, recipient: SubscriberId) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(&recipient)
            .copied()
            .unwrap_or(0)
    }

    pub fn forwarded(&self) -> Vec<ForwardedMessage> {
        self.forwarded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(
        &self,
        recipient: SubscriberId,
        text: &str,
    ) -> Result<(), TransportError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(recipient).or_insert(0);
            *count += 1;
            *count
        };

        let explode = self.panics.lock().unwrap().contains(&recipient);
        if explode {
            panic!("transport exploded for {recipient}");
        }
        let hang = self.hangs.lock().unwrap().contains(&recipient);
        if hang {
            std::future::pending::<()>().await;
        }
        let delay = self.delays.lock().unwrap().remove(&(recipient, attempt));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.lock().unwrap().remove(&(recipient, attempt));
        if let Some(error) = failure {
            return Err(error);
        }

        self.sent.lock().unwrap().push(SentMessage {
            recipient,
            text: text.to_string(),
            at: tokio::time::Instant::now(),
        });
        Ok(())
    }

    async fn forward_message(
        &self,
        target: SubscriberId,
        source_chat: u64,
        message_id: u64,
    ) -> Result<(), TransportError> {
        let failure = self.forward_failure.lock().unwrap().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.forwarded.lock().unwrap().push(ForwardedMessage {
            target,
            source_chat,
            message_id,
        });
        Ok(())
    }
}

pub fn sampler_with(categories: Vec<(&str, Vec<&str>)>) -> ContentSampler {
    ContentSampler::new(Arc::new(ContentPool::from_categories(categories)))
}

/// Empty registry backed by a fresh temp dir; keep the dir alive for the test
pub async fn temp_registry() -> (TempDir, Arc<SubscriberRegistry>) {
    let dir = tempfile::tempdir().unwrap();
    let store = SubscriberStore::new(dir.path().join("subscribers.json"));
    let registry = SubscriberRegistry::load(store).await.unwrap();
    (dir, Arc::new(registry))
}
