//! Messaging transport boundary
//!
//! The delivery engine, the triggers and the reply relay only ever talk to
//! [`Transport`]. The Discord implementation lives in `crate::discord`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use thiserror::Error;

use crate::features::subscribers::SubscriberId;

/// Why a transport call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The recipient blocked the bot or no longer exists. Further sends will
    /// keep failing until they reach out again.
    #[error("recipient unreachable: {description}")]
    Unreachable { description: String },

    /// The platform rejected this particular request (bad payload, rate limit, ...)
    #[error("request rejected{}: {description}", code_suffix(code))]
    Request {
        code: Option<i64>,
        description: String,
    },

    /// The platform could not be reached at all
    #[error("network error: {0}")]
    Network(String),
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" (code {c})")).unwrap_or_default()
}

impl TransportError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable { .. })
    }
}

/// Outbound messaging operations
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `text` to the private chat of `recipient`
    async fn send_message(&self, recipient: SubscriberId, text: &str)
        -> Result<(), TransportError>;

    /// Relay message `message_id` from chat `source_chat` to `target`
    async fn forward_message(
        &self,
        target: SubscriberId,
        source_chat: u64,
        message_id: u64,
    ) -> Result<(), TransportError>;
}
