//! # Features
//!
//! Domain features of the courier, leaves first: content and subscribers,
//! then delivery, then the triggers and relay that drive it.

pub mod content;
pub mod delivery;
pub mod relay;
pub mod scheduling;
pub mod subscribers;
pub mod triggers;

pub use content::{ContentError, ContentItem, ContentPool, ContentSampler};
pub use delivery::{DeliveryEngine, DeliveryOutcome, DeliveryReport, Transport, TransportError};
pub use relay::{InboundReply, ReplyRelay};
pub use scheduling::{DailySchedule, DelayedJobs};
pub use subscribers::{
    RegistryError, Subscriber, SubscriberId, SubscriberRegistry, SubscriberStore,
    SubscriptionEvent, SubscriptionState,
};
pub use triggers::{StartOutcome, TriggerMessages, Triggers};
