//! On-demand task handler
//!
//! Handles: send_task
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply_ephemeral;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::discord::subscriber_from_user;

/// Handler for /send_task
pub struct TaskHandler;

#[async_trait]
impl SlashCommandHandler for TaskHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["send_task"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        // The interaction must be answered within 3 seconds, so the
        // delivery itself runs detached.
        ctx.triggers
            .request_delivery(subscriber_from_user(&command.user));
        reply_ephemeral(serenity_ctx, command, "📦 New tasks are on the way to your DMs.").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(TaskHandler.command_names(), &["send_task"]);
    }
}
