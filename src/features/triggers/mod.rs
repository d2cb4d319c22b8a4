//! # Triggers Feature
//!
//! Everything that decides *when* the delivery engine runs: first contact
//! with a delayed welcome batch, on-demand requests, the daily fan-out over
//! the whole roster, and opt-out.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Welcome batch is queued before the welcome DM and skipped once unsubscribed
//! - 1.2.0: Opt-out cancels a pending welcome batch
//! - 1.1.0: Daily fan-out runs one task per subscriber
//! - 1.0.0: Initial release

use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::features::delivery::{DeliveryEngine, DeliveryOutcome, DeliveryReport, Transport};
use crate::features::scheduling::{DailySchedule, DelayedJobs};
use crate::features::subscribers::{
    AddOutcome, RegistryError, RemoveOutcome, Subscriber, SubscriberRegistry, SubscriptionEvent,
    SubscriptionState,
};

/// User-facing texts sent by the triggers
#[derive(Debug, Clone)]
pub struct TriggerMessages {
    pub welcome: String,
    pub already_subscribed: String,
    pub stopped: String,
}

impl TriggerMessages {
    pub fn new(reviewer_name: &str, welcome_delay: Duration) -> Self {
        Self {
            welcome: format!(
                "👋 Hi! I'm here to help you practice every day together with {reviewer_name}.\n\n\
                 Your first tasks arrive in about {} seconds. Solve them today and reply to a task \
                 message with your answer: {reviewer_name} will check it.\n\n\
                 From tomorrow on I'll send new tasks on my own. Want more? Use `/send_task`.",
                welcome_delay.as_secs()
            ),
            already_subscribed: "ℹ️ You're already subscribed.".to_string(),
            stopped: "🛑 No more daily tasks. Use `/start` whenever you want to resume."
                .to_string(),
        }
    }
}

/// Result of [`Triggers::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Registered,
    AlreadySubscribed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutSummary {
    pub completed: usize,
    pub removed: usize,
    pub failed: usize,
}

impl FanOutSummary {
    fn from_reports(reports: &[DeliveryReport]) -> Self {
        reports
            .iter()
            .fold(Self::default(), |mut summary, report| {
                match report.outcome {
                    DeliveryOutcome::Completed => summary.completed += 1,
                    DeliveryOutcome::Unreachable { .. } => summary.removed += 1,
                    _ => summary.failed += 1,
                }
                summary
            })
    }
}

pub struct Triggers {
    engine: Arc<DeliveryEngine>,
    registry: Arc<SubscriberRegistry>,
    transport: Arc<dyn Transport>,
    followups: Arc<DelayedJobs>,
    welcome_delay: Duration,
    messages: TriggerMessages,
}

impl Triggers {
    pub fn new(
        engine: Arc<DeliveryEngine>,
        registry: Arc<SubscriberRegistry>,
        transport: Arc<dyn Transport>,
        welcome_delay: Duration,
        messages: TriggerMessages,
    ) -> Self {
        Self {
            engine,
            registry,
            transport,
            followups: DelayedJobs::new(),
            welcome_delay,
            messages,
        }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// First contact: register, greet, and queue one welcome batch.
    ///
    /// Known identities only get a reminder that they are subscribed.
    pub async fn start(&self, subscriber: Subscriber) -> Result<StartOutcome, RegistryError> {
        let name = subscriber.display_name();
        let before = self.registry.state(subscriber.id).await;

        if self.registry.add(subscriber.clone()).await? == AddOutcome::AlreadySubscribed {
            info!("{name} is already subscribed");
            self.notify(&subscriber, &self.messages.already_subscribed).await;
            return Ok(StartOutcome::AlreadySubscribed);
        }

        info!(
            "🆕 New subscriber {name} added ({before} -> {})",
            before.on(SubscriptionEvent::Start)
        );

        // Queue first: stop() may run while the welcome is in flight
        let engine = Arc::clone(&self.engine);
        let registry = Arc::clone(&self.registry);
        let follower = subscriber.clone();
        self.followups.schedule(subscriber.id, self.welcome_delay, async move {
            if registry.state(follower.id).await != SubscriptionState::Registered {
                info!(
                    "Skipping welcome tasks for {}: no longer subscribed",
                    follower.display_name()
                );
                return;
            }
            engine.deliver(&follower).await;
        });

        self.notify(&subscriber, &self.messages.welcome).await;

        Ok(StartOutcome::Registered)
    }

    /// Deliver right away, registered or not. Runs on its own task.
    pub fn request_delivery(&self, subscriber: Subscriber) -> JoinHandle<DeliveryReport> {
        info!(
            "{} ({}) requested new tasks",
            subscriber.display_name(),
            subscriber.id
        );
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move { engine.deliver(&subscriber).await })
    }

    /// Opt-out: confirm, forget any pending welcome batch, and deregister
    pub async fn stop(&self, subscriber: &Subscriber) -> Result<RemoveOutcome, RegistryError> {
        self.notify(subscriber, &self.messages.stopped).await;

        let before = self.registry.state(subscriber.id).await;
        info!(
            "{} unsubscribed ({before} -> {})",
            subscriber.display_name(),
            before.on(SubscriptionEvent::Stop)
        );

        if self.followups.cancel(subscriber.id) {
            info!(
                "Cancelled pending welcome tasks for {}",
                subscriber.display_name()
            );
        }

        self.registry.remove(subscriber.id).await
    }

    /// Deliver to every registered subscriber, each on an independent task.
    ///
    /// Returns the reports of deliveries that finished; a delivery task that
    /// panicked is logged and left out.
    pub async fn fan_out(&self) -> Vec<DeliveryReport> {
        let subscribers = self.registry.all().await;
        info!("📬 Daily delivery to {} subscribers", subscribers.len());

        let handles: Vec<_> = subscribers
            .into_iter()
            .map(|subscriber| {
                let id = subscriber.id;
                let engine = Arc::clone(&self.engine);
                (id, tokio::spawn(async move { engine.deliver(&subscriber).await }))
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => error!("Daily delivery task for subscriber {id} failed: {e}"),
            }
        }

        let summary = FanOutSummary::from_reports(&reports);
        info!(
            "Daily delivery finished: {} complete, {} removed, {} failed",
            summary.completed, summary.removed, summary.failed
        );
        reports
    }

    /// Fan out at every firing of `schedule`, forever
    pub async fn run_daily(self: Arc<Self>, schedule: DailySchedule) {
        info!("Daily deliveries scheduled {schedule}");
        schedule
            .run(|| {
                let triggers = Arc::clone(&self);
                async move {
                    triggers.fan_out().await;
                }
            })
            .await;
    }

    async fn notify(&self, subscriber: &Subscriber, text: &str) {
        if let Err(e) = self.transport.send_message(subscriber.id, text).await {
            warn!(
                "Could not message {} ({}): {e}",
                subscriber.display_name(),
                subscriber.id
            );
        }
    }
}
