//! # Command System
//!
//! Slash commands for subscribing, unsubscribing and requesting tasks.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Subscription commands /start, /send_task and /stop
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use handlers::create_all_handlers;
pub use registry::CommandRegistry;
pub use slash::{create_slash_commands, register_global_commands, register_guild_commands};
