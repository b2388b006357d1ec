use {
    anyhow::{Context as _, Result},
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serenity::{
        Client,
        all::{Context, EventHandler, GatewayIntents, Message, ReactionType, Ready},
    },
    tracing::{debug, info, warn},
};

use {
    onair_channels::{AckMarker, InboundMessage, MessageAck},
    onair_live::{ChatCommandHandler, LiveCommand},
};

/// Reacts to the command message with the outcome marker.
struct ReactionAck<'a> {
    ctx: &'a Context,
    msg: &'a Message,
}

#[async_trait]
impl<'a> MessageAck for ReactionAck<'a> {
    async fn ack(&self, marker: AckMarker) -> Result<()> {
        self.msg
            .react(self.ctx, ReactionType::Unicode(marker.emoji().to_string()))
            .await
            .context("failed to add reaction")?;
        Ok(())
    }
}

pub struct LiveBotHandler {
    commands: ChatCommandHandler,
}

impl LiveBotHandler {
    pub fn new(commands: ChatCommandHandler) -> Self {
        Self { commands }
    }
}

#[serenity::async_trait]
impl EventHandler for LiveBotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            control_channel = self.commands.control_channel(),
            "discord bot connected"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Resolving the channel name costs a lookup; skip everything that
        // cannot be a command first.
        if LiveCommand::parse(&msg.content).is_none() {
            return;
        }

        let channel_name = match msg.channel(&ctx).await {
            Ok(channel) => channel.guild().map(|c| c.name),
            Err(e) => {
                warn!(channel_id = %msg.channel_id, error = %e, "failed to resolve channel");
                return;
            },
        };

        let inbound = InboundMessage {
            author_is_bot: msg.author.bot || msg.webhook_id.is_some(),
            channel_name,
            content: msg.content.clone(),
        };
        let ack = ReactionAck {
            ctx: &ctx,
            msg: &msg,
        };
        let outcome = self.commands.handle(&inbound, &ack).await;
        debug!(message_id = %msg.id, ?outcome, "handled message");
    }
}

/// Connect to Discord and run until the gateway connection ends.
pub async fn run_bot(token: &Secret<String>, commands: ChatCommandHandler) -> Result<()> {
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token.expose_secret(), intents)
        .event_handler(LiveBotHandler::new(commands))
        .await
        .context("failed to create discord client")?;

    info!("starting discord bot");
    client.start().await.context("discord client stopped")
}
