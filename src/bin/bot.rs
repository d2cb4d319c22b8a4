use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use taskcourier::commands::{
    create_all_handlers, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry,
};
use taskcourier::core::Config;
use taskcourier::discord::{inbound_reply, SerenityTransport};
use taskcourier::features::{
    ContentPool, ContentSampler, DeliveryEngine, ReplyRelay, SubscriberRegistry, SubscriberStore,
    Transport, TriggerMessages, Triggers,
};

struct Handler {
    command_ctx: Arc<CommandContext>,
    registry: CommandRegistry,
    relay: Arc<ReplyRelay>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let Some(reply) = inbound_reply(&msg, ctx.cache.current_user_id()) else {
            return;
        };

        if let Err(e) = self.relay.relay(&reply).await {
            error!(
                "Failed to relay answer from {}: {e}",
                reply.sender.display_name()
            );
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Sorry, I couldn't pass your answer on. Please try again later.",
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);
        info!(
            "👥 {} subscribers on record",
            self.command_ctx.triggers.registry().len().await
        );

        // Guild commands update instantly, global ones can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self
                .registry
                .dispatch(Arc::clone(&self.command_ctx), &ctx, &command)
                .await
            {
                error!(
                    "Error handling slash command '{}': {}",
                    command.data.name, e
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting task courier...");

    let pool = Arc::new(ContentPool::load_dir(&config.content_dir)?);
    if pool.total_items() == 0 {
        warn!(
            "⚠️ No tasks found in {}; deliveries will fail until content is added",
            config.content_dir.display()
        );
    }

    let registry = Arc::new(
        SubscriberRegistry::load(SubscriberStore::new(config.subscribers_path.clone())).await?,
    );

    let http = Arc::new(Http::new(&config.discord_token));
    let transport: Arc<dyn Transport> = Arc::new(SerenityTransport::new(http));

    let engine = Arc::new(DeliveryEngine::new(
        ContentSampler::new(pool),
        Arc::clone(&registry),
        Arc::clone(&transport),
        config.batch_size,
        config.send_timeout,
    ));
    let triggers = Arc::new(Triggers::new(
        engine,
        registry,
        Arc::clone(&transport),
        config.welcome_delay,
        TriggerMessages::new(&config.reviewer_name, config.welcome_delay),
    ));
    let relay = Arc::new(ReplyRelay::new(
        transport,
        config.reviewer_id,
        &config.reviewer_name,
    ));

    // Parse guild ID if provided for development mode
    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        command_ctx: Arc::new(CommandContext::new(Arc::clone(&triggers))),
        registry: CommandRegistry::with_handlers(create_all_handlers()),
        relay,
        guild_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    tokio::spawn(triggers.run_daily(config.daily_schedule));

    info!("Establishing WebSocket connection to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
