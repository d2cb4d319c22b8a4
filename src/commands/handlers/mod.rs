//! Per-command handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 3.0.0: SubscriptionHandler (start, stop) and TaskHandler (send_task)
//! - 1.0.0: Initial handler split

pub mod subscription;
pub mod tasks;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::handler::SlashCommandHandler;

pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(subscription::SubscriptionHandler),
        Arc::new(tasks::TaskHandler),
    ]
}

/// Answer an interaction with a message only the invoker sees
pub(crate) async fn reply_ephemeral(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    text: &str,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(text).ephemeral(true))
        })
        .await?;
    Ok(())
}
