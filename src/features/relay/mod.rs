//! # Reply Relay Feature
//!
//! Forwards subscriber answers, together with the task they answer, to the
//! reviewer. Stateless: the subscriber roster is never consulted.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use log::info;
use std::sync::Arc;

use crate::features::delivery::{Transport, TransportError};
use crate::features::subscribers::{Subscriber, SubscriberId};

/// A subscriber message that replies to an earlier bot message
#[derive(Debug, Clone)]
pub struct InboundReply {
    pub sender: Subscriber,
    /// Chat both messages live in
    pub chat_id: u64,
    /// The delivered task being answered
    pub original_message_id: u64,
    pub reply_message_id: u64,
}

pub struct ReplyRelay {
    transport: Arc<dyn Transport>,
    reviewer: SubscriberId,
    acknowledgement: String,
}

impl ReplyRelay {
    pub fn new(transport: Arc<dyn Transport>, reviewer: SubscriberId, reviewer_name: &str) -> Self {
        Self {
            transport,
            reviewer,
            acknowledgement: format!(
                "✅ Thanks! Your answer has been sent to {reviewer_name} for review."
            ),
        }
    }

    /// Forward the task, then the answer, then thank the sender
    pub async fn relay(&self, reply: &InboundReply) -> Result<(), TransportError> {
        self.transport
            .forward_message(self.reviewer, reply.chat_id, reply.original_message_id)
            .await?;
        self.transport
            .forward_message(self.reviewer, reply.chat_id, reply.reply_message_id)
            .await?;

        info!(
            "📨 Forwarded {}'s answer to the reviewer",
            reply.sender.display_name()
        );

        self.transport
            .send_message(reply.sender.id, &self.acknowledgement)
            .await
    }
}
