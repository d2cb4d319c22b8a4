//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 2.0.0: Hold the subscription triggers
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;

use crate::features::triggers::Triggers;

/// Shared context for all command handlers
#[derive(Clone)]
pub struct CommandContext {
    pub triggers: Arc<Triggers>,
}

impl CommandContext {
    pub fn new(triggers: Arc<Triggers>) -> Self {
        Self { triggers }
    }
}
