//! # Subscribers Feature
//!
//! Subscriber roster with a flat-file mirror and an explicit subscription
//! state machine.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Roll back in-memory mutations when the store cannot be written
//! - 1.1.0: Identity-only equality for subscriber records
//! - 1.0.0: Initial release with JSON store

pub mod model;
pub mod registry;
pub mod store;

pub use model::{Subscriber, SubscriberId, SubscriptionEvent, SubscriptionState};
pub use registry::{AddOutcome, RemoveOutcome, SubscriberRegistry};
pub use store::SubscriberStore;

use std::path::PathBuf;
use thiserror::Error;

/// Subscriber store errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("subscriber store {path} could not be written: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("subscriber store {path} could not be read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("subscriber store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
