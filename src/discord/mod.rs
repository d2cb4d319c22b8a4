//! # Discord Adapter
//!
//! Binds the courier to Discord: a serenity-backed [`Transport`] plus the
//! conversions from gateway events into domain values.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! [`Transport`]: crate::features::delivery::Transport

pub mod transport;

pub use transport::{classify, classify_response, SerenityTransport};

use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::model::user::User;

use crate::features::relay::InboundReply;
use crate::features::subscribers::Subscriber;

/// Build a subscriber record from a Discord user
pub fn subscriber_from_user(user: &User) -> Subscriber {
    Subscriber::new(user.id.0).with_nickname(user.name.clone())
}

/// A DM that replies to something the bot posted, if `msg` is one
pub fn inbound_reply(msg: &Message, bot_id: UserId) -> Option<InboundReply> {
    if msg.guild_id.is_some() || msg.author.bot {
        return None;
    }
    let original = msg.referenced_message.as_ref()?;
    if original.author.id != bot_id {
        return None;
    }

    Some(InboundReply {
        sender: subscriber_from_user(&msg.author),
        chat_id: msg.channel_id.0,
        original_message_id: original.id.0,
        reply_message_id: msg.id.0,
    })
}
