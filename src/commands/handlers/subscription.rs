//! Subscription command handlers
//!
//! Handles: start, stop
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::error;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply_ephemeral;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::discord::subscriber_from_user;
use crate::features::subscribers::RemoveOutcome;
use crate::features::triggers::StartOutcome;

const STORAGE_FAILURE: &str = "⚠️ Something went wrong while saving your subscription. Please try again later.";

/// Handler for /start and /stop
pub struct SubscriptionHandler;

#[async_trait]
impl SlashCommandHandler for SubscriptionHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start", "stop"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "start" => self.handle_start(&ctx, serenity_ctx, command).await,
            "stop" => self.handle_stop(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl SubscriptionHandler {
    async fn handle_start(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let subscriber = subscriber_from_user(&command.user);
        let text = match ctx.triggers.start(subscriber).await {
            Ok(StartOutcome::Registered) => "📬 You're subscribed! Check your DMs.",
            Ok(StartOutcome::AlreadySubscribed) => "ℹ️ You're already subscribed.",
            Err(e) => {
                error!("Failed to subscribe {}: {e}", command.user.id);
                STORAGE_FAILURE
            }
        };
        reply_ephemeral(serenity_ctx, command, text).await
    }

    async fn handle_stop(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let subscriber = subscriber_from_user(&command.user);
        let text = match ctx.triggers.stop(&subscriber).await {
            Ok(RemoveOutcome::Removed(_)) => "🛑 Unsubscribed from daily tasks.",
            Ok(RemoveOutcome::NotPresent) => "ℹ️ You weren't subscribed.",
            Err(e) => {
                error!("Failed to unsubscribe {}: {e}", command.user.id);
                STORAGE_FAILURE
            }
        };
        reply_ephemeral(serenity_ctx, command, text).await
    }
}
