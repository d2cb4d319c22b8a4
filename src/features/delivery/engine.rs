//! # Delivery Engine
//!
//! Samples a fresh batch for one subscriber and sends it item by item. The
//! first failed send ends the batch; a permanently unreachable recipient is
//! also dropped from the roster.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Per-send timeout, run ids in every log line
//! - 1.0.0: Initial release

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

use super::transport::{Transport, TransportError};
use crate::features::content::ContentSampler;
use crate::features::subscribers::{
    RemoveOutcome, Subscriber, SubscriberId, SubscriberRegistry, SubscriptionEvent,
};

/// How a single delivery ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Every item in the batch was sent
    Completed,
    /// The recipient is gone for good. `removed` is false when the roster
    /// could not be updated.
    Unreachable { removed: bool },
    /// A request or network failure stopped the batch; the subscriber stays
    Aborted(TransportError),
    /// No batch could be drawn from the content pool
    SampleFailed(String),
}

/// Summary of one `deliver` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub run_id: Uuid,
    pub subscriber: SubscriberId,
    pub batch_len: usize,
    pub sent: usize,
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == DeliveryOutcome::Completed
    }
}

pub struct DeliveryEngine {
    sampler: ContentSampler,
    registry: Arc<SubscriberRegistry>,
    transport: Arc<dyn Transport>,
    batch_size: usize,
    send_timeout: Duration,
}

impl DeliveryEngine {
    pub fn new(
        sampler: ContentSampler,
        registry: Arc<SubscriberRegistry>,
        transport: Arc<dyn Transport>,
        batch_size: usize,
        send_timeout: Duration,
    ) -> Self {
        Self {
            sampler,
            registry,
            transport,
            batch_size,
            send_timeout,
        }
    }

    /// Send a freshly sampled batch to `subscriber`.
    ///
    /// Never fails: every problem is logged and folded into the report, so
    /// one subscriber's trouble cannot leak into a fan-out over many.
    pub async fn deliver(&self, subscriber: &Subscriber) -> DeliveryReport {
        let run_id = Uuid::new_v4();
        let name = subscriber.display_name();
        let mut report = DeliveryReport {
            run_id,
            subscriber: subscriber.id,
            batch_len: 0,
            sent: 0,
            outcome: DeliveryOutcome::Completed,
        };

        let batch = match self.sampler.sample(self.batch_size) {
            Ok(batch) => batch,
            Err(e) => {
                error!("[{run_id}] Could not pick tasks for {name}: {e}");
                report.outcome = DeliveryOutcome::SampleFailed(e.to_string());
                return report;
            }
        };
        report.batch_len = batch.len();
        info!("[{run_id}] Sending {} tasks to {name}", batch.len());

        for (index, item) in batch.iter().enumerate() {
            match self.send(subscriber.id, &item.text).await {
                Ok(()) => {
                    report.sent += 1;
                    debug!(
                        "[{run_id}] Sent {}/{} ({}) to {name}",
                        index + 1,
                        batch.len(),
                        item.category
                    );
                }
                Err(e) if e.is_unreachable() => {
                    info!("[{run_id}] {name} blocked the bot: {e}");
                    let removed = self.deregister(run_id, subscriber).await;
                    report.outcome = DeliveryOutcome::Unreachable { removed };
                    return report;
                }
                Err(e) => {
                    warn!(
                        "[{run_id}] Delivery to {name} stopped at item {}/{}: {e}",
                        index + 1,
                        batch.len()
                    );
                    report.outcome = DeliveryOutcome::Aborted(e);
                    return report;
                }
            }
        }

        report
    }

    async fn send(&self, recipient: SubscriberId, text: &str) -> Result<(), TransportError> {
        match timeout(self.send_timeout, self.transport.send_message(recipient, text)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Network(format!(
                "send timed out after {}s",
                self.send_timeout.as_secs()
            ))),
        }
    }

    async fn deregister(&self, run_id: Uuid, subscriber: &Subscriber) -> bool {
        let before = self.registry.state(subscriber.id).await;
        let after = before.on(SubscriptionEvent::PermanentFailure);

        match self.registry.remove(subscriber.id).await {
            Ok(RemoveOutcome::Removed(_)) => {
                info!(
                    "[{run_id}] {} {before} -> {after}",
                    subscriber.display_name()
                );
                true
            }
            Ok(RemoveOutcome::NotPresent) => true,
            Err(e) => {
                error!(
                    "[{run_id}] Failed to remove unreachable subscriber {} ({}): {e}",
                    subscriber.display_name(),
                    subscriber.id
                );
                false
            }
        }
    }
}
