// Core layer - configuration and shared message utilities
pub mod core;

// Features layer - content, subscribers, delivery, triggers
pub mod features;

// Discord adapter - serenity-backed transport
pub mod discord;

// Application layer - slash commands
pub mod commands;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export core config
pub use crate::core::Config;

// Re-export feature items
pub use features::{
    // Content
    ContentPool, ContentSampler,
    // Delivery
    DeliveryEngine, DeliveryReport, Transport, TransportError,
    // Relay
    InboundReply, ReplyRelay,
    // Scheduling
    DailySchedule,
    // Subscribers
    Subscriber, SubscriberRegistry, SubscriberStore,
    // Triggers
    TriggerMessages, Triggers,
};

pub use discord::SerenityTransport;
