//! Subscriber records and the subscription state machine
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Equality and hashing by identity only
//! - 1.0.0: Initial release

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable recipient handle (the Discord user id)
pub type SubscriberId = u64;

/// A user who receives daily tasks.
///
/// Display-name fields exist for logs only. Two records with the same `id`
/// are the same subscriber no matter what their names say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    #[serde(rename = "chat_id")]
    pub id: SubscriberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "surname", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Subscriber {
    pub fn new(id: SubscriberId) -> Self {
        Self {
            id,
            nickname: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_names(mut self, first: Option<String>, last: Option<String>) -> Self {
        self.first_name = first;
        self.last_name = last;
        self
    }

    /// Best human-readable name: nickname, full name, first name, then id
    pub fn display_name(&self) -> String {
        if let Some(nickname) = &self.nickname {
            return nickname.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => self.id.to_string(),
        }
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Subscriber {}

impl Hash for Subscriber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Whether an identity is currently on the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    Unregistered,
    Registered,
}

/// Things that move an identity between subscription states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionEvent {
    /// First contact (`/start`)
    Start,
    /// Explicit opt-out (`/stop`)
    Stop,
    /// The transport reported the recipient as permanently unreachable
    PermanentFailure,
}

impl SubscriptionState {
    /// State after applying `event`
    pub fn on(self, event: SubscriptionEvent) -> Self {
        match event {
            SubscriptionEvent::Start => SubscriptionState::Registered,
            SubscriptionEvent::Stop | SubscriptionEvent::PermanentFailure => {
                SubscriptionState::Unregistered
            }
        }
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionState::Unregistered => write!(f, "unregistered"),
            SubscriptionState::Registered => write!(f, "registered"),
        }
    }
}
