//! # Serenity Transport
//!
//! [`Transport`] over Discord direct messages.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Split long texts at the 2000 character message limit
//! - 1.0.0: Initial release with DM sending and reply relaying

use async_trait::async_trait;
use log::debug;
use serenity::http::{Http, HttpError};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::Error as SerenityError;
use std::sync::Arc;

use crate::core::chunk_for_message;
use crate::features::delivery::{Transport, TransportError};
use crate::features::subscribers::SubscriberId;

/// JSON error code: "Cannot send messages to this user"
const CANNOT_MESSAGE_USER: i64 = 50007;
/// JSON error code: "Unknown User"
const UNKNOWN_USER: i64 = 10013;
const FORBIDDEN: u16 = 403;

pub struct SerenityTransport {
    http: Arc<Http>,
}

impl SerenityTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn send_chunks(&self, recipient: SubscriberId, text: &str) -> Result<(), SerenityError> {
        let http: &Http = &self.http;
        let dm = UserId(recipient).create_dm_channel(http).await?;
        for chunk in chunk_for_message(text) {
            dm.id.say(http, chunk).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for SerenityTransport {
    async fn send_message(
        &self,
        recipient: SubscriberId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.send_chunks(recipient, text).await.map_err(classify)
    }

    async fn forward_message(
        &self,
        target: SubscriberId,
        source_chat: u64,
        message_id: u64,
    ) -> Result<(), TransportError> {
        let http: &Http = &self.http;
        let message = ChannelId(source_chat)
            .message(http, MessageId(message_id))
            .await
            .map_err(classify)?;

        debug!("Relaying message {message_id} from channel {source_chat} to {target}");
        self.send_chunks(target, &relay_text(&message))
            .await
            .map_err(classify)
    }
}

/// Discord has no native forward here, so the copy names its author
fn relay_text(message: &Message) -> String {
    let mut text = format!(
        "📨 **{}** (`{}`):\n{}",
        message.author.name, message.author.id, message.content
    );
    for attachment in &message.attachments {
        text.push('\n');
        text.push_str(&attachment.url);
    }
    text
}

/// Map a serenity failure onto the transport taxonomy
pub fn classify(err: SerenityError) -> TransportError {
    match err {
        SerenityError::Http(http_err) => match *http_err {
            HttpError::UnsuccessfulRequest(response) => classify_response(
                response.status_code.as_u16(),
                response.error.code as i64,
                &response.error.message,
            ),
            HttpError::Request(e) => TransportError::Network(e.to_string()),
            other => TransportError::Request {
                code: None,
                description: other.to_string(),
            },
        },
        SerenityError::Io(e) => TransportError::Network(e.to_string()),
        SerenityError::Tungstenite(e) => TransportError::Network(e.to_string()),
        SerenityError::Gateway(e) => TransportError::Network(e.to_string()),
        other => TransportError::Request {
            code: None,
            description: other.to_string(),
        },
    }
}

/// Classify an unsuccessful Discord HTTP response
pub fn classify_response(status: u16, code: i64, message: &str) -> TransportError {
    if status == FORBIDDEN || code == CANNOT_MESSAGE_USER || code == UNKNOWN_USER {
        TransportError::Unreachable {
            description: format!("{message} (HTTP {status}, code {code})"),
        }
    } else if status >= 500 {
        TransportError::Network(format!("Discord returned HTTP {status}: {message}"))
    } else {
        TransportError::Request {
            code: Some(code),
            description: format!("{message} (HTTP {status})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_user_is_unreachable() {
        let err = classify_response(403, CANNOT_MESSAGE_USER, "Cannot send messages to this user");
        assert!(err.is_unreachable());
    }

    #[test]
    fn test_unknown_user_is_unreachable() {
        assert!(classify_response(404, UNKNOWN_USER, "Unknown User").is_unreachable());
    }

    #[test]
    fn test_bad_payload_is_request_error() {
        let err = classify_response(400, 50006, "Cannot send an empty message");
        assert_eq!(
            err,
            TransportError::Request {
                code: Some(50006),
                description: "Cannot send an empty message (HTTP 400)".into(),
            }
        );
    }

    #[test]
    fn test_server_error_is_network_error() {
        assert!(matches!(
            classify_response(502, 0, "Bad Gateway"),
            TransportError::Network(_)
        ));
    }

    #[test]
    fn test_io_error_is_network_error() {
        let err = classify(SerenityError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        )));
        assert!(matches!(err, TransportError::Network(_)));
    }
}
