use crate::commands;
use crate::context::{ArgValue, Invocation, Invoker};
use crate::dispatch::{Dispatcher, ReplySurface};
use crate::error::ReplyError;
use crate::model::ShardManagerContainer;
use crate::reply::ReplyChannel;
use serenity::async_trait;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EditInteractionResponse,
};
use serenity::client::Context;
use serenity::http::Http;
use serenity::model::application::{CommandDataOptionValue, CommandInteraction, Interaction};
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::user::User;
use serenity::model::{channel::Message, gateway::Ready};
use serenity::prelude::EventHandler;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct Handler {
    pub dispatcher: Arc<Dispatcher>,
    /// When set, guild messages from other guilds are ignored and slash
    /// commands are registered to this guild on ready.
    pub allowed_guild_id: Option<GuildId>,
}

impl Handler {
    fn guild_allowed(&self, guild_id: Option<GuildId>) -> bool {
        match (self.allowed_guild_id, guild_id) {
            (Some(allowed), Some(guild)) => allowed == guild,
            _ => true,
        }
    }
}

fn invoker(user: &User) -> Invoker {
    Invoker {
        id: user.id.get(),
        name: user.name.clone(),
    }
}

async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let data = ctx.data.read().await;
    let shard_manager = data.get::<ShardManagerContainer>()?;
    let runners = shard_manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

fn option_value(value: &CommandDataOptionValue) -> Option<ArgValue> {
    match value {
        CommandDataOptionValue::String(s) => Some(ArgValue::Text(s.clone())),
        CommandDataOptionValue::Integer(n) => Some(ArgValue::Integer(*n)),
        CommandDataOptionValue::Boolean(b) => Some(ArgValue::Flag(*b)),
        _ => None,
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if !self.guild_allowed(command.guild_id) {
            return;
        }
        let options = command
            .data
            .options
            .iter()
            .filter_map(|o| option_value(&o.value).map(|v| (o.name.clone(), v)))
            .collect();
        let invocation =
            Invocation::structured(command.data.name.clone(), options, invoker(&command.user));
        let surface = InteractionSurface {
            http: ctx.http.clone(),
            user_id: command.user.id,
            latency: shard_latency(&ctx).await,
            interaction: Arc::new(command),
        };
        self.dispatcher.dispatch(invocation, &surface).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !self.guild_allowed(msg.guild_id) {
            return;
        }
        let Some(invocation) =
            Invocation::from_text(&msg.content, self.dispatcher.prefix(), invoker(&msg.author))
        else {
            return;
        };
        let surface = MessageSurface {
            http: ctx.http.clone(),
            channel_id: msg.channel_id,
            message_id: msg.id,
            user_id: msg.author.id,
            latency: shard_latency(&ctx).await,
        };
        self.dispatcher.dispatch(invocation, &surface).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(target = "gateway", user = %ready.user.name, guilds = ready.guilds.len(), "connected and ready");
        let Some(guild) = self.allowed_guild_id else {
            debug!(target = "gateway", "no GUILD_ID; relying on global command registration");
            return;
        };
        match guild.set_commands(&ctx.http, commands::register_all()).await {
            Ok(registered) => {
                info!(target = "gateway", guild = guild.get(), count = registered.len(), "registered guild commands")
            }
            Err(e) => error!(target = "gateway", guild = guild.get(), error = %e, "guild command registration failed"),
        }
    }
}

/// Text trigger: replies reference the invoking message.
struct MessageSurface {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
    user_id: UserId,
    latency: Option<Duration>,
}

#[async_trait]
impl ReplySurface for MessageSurface {
    async fn defer(&self) -> Result<(), ReplyError> {
        // Text messages have no deferral handshake.
        Ok(())
    }

    fn reply_channel(&self, _deferred: bool) -> Box<dyn ReplyChannel> {
        Box::new(MessageReplyChannel {
            http: self.http.clone(),
            channel_id: self.channel_id,
            message_id: self.message_id,
        })
    }

    fn direct_channel(&self) -> Box<dyn ReplyChannel> {
        Box::new(DirectMessageChannel {
            http: self.http.clone(),
            user_id: self.user_id,
        })
    }

    fn gateway_latency(&self) -> Option<Duration> {
        self.latency
    }
}

/// Slash trigger.
struct InteractionSurface {
    http: Arc<Http>,
    interaction: Arc<CommandInteraction>,
    user_id: UserId,
    latency: Option<Duration>,
}

#[async_trait]
impl ReplySurface for InteractionSurface {
    async fn defer(&self) -> Result<(), ReplyError> {
        debug!(target = "ui.defer", command = %self.interaction.data.name, "deferring interaction");
        self.interaction
            .defer(&self.http)
            .await
            .map_err(|e| ReplyError::Send(e.to_string()))
    }

    fn reply_channel(&self, deferred: bool) -> Box<dyn ReplyChannel> {
        if deferred {
            Box::new(DeferredEditChannel {
                http: self.http.clone(),
                interaction: self.interaction.clone(),
            })
        } else {
            Box::new(InteractionReplyChannel {
                http: self.http.clone(),
                interaction: self.interaction.clone(),
                responded: AtomicBool::new(false),
            })
        }
    }

    fn direct_channel(&self) -> Box<dyn ReplyChannel> {
        Box::new(DirectMessageChannel {
            http: self.http.clone(),
            user_id: self.user_id,
        })
    }

    fn gateway_latency(&self) -> Option<Duration> {
        self.latency
    }
}

struct MessageReplyChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

#[async_trait]
impl ReplyChannel for MessageReplyChannel {
    async fn reply(&self, text: &str) -> Result<(), ReplyError> {
        let builder = CreateMessage::new()
            .content(text)
            .reference_message((self.channel_id, self.message_id));
        self.channel_id
            .send_message(&self.http, builder)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!(target = "reply.send", channel = self.channel_id.get(), error = %e, "channel reply failed");
                ReplyError::Send(e.to_string())
            })
    }
}

/// First call answers the interaction, later calls are followups.
struct InteractionReplyChannel {
    http: Arc<Http>,
    interaction: Arc<CommandInteraction>,
    responded: AtomicBool,
}

#[async_trait]
impl ReplyChannel for InteractionReplyChannel {
    async fn reply(&self, text: &str) -> Result<(), ReplyError> {
        let result = if self.responded.swap(true, Ordering::SeqCst) {
            self.interaction
                .create_followup(
                    &self.http,
                    CreateInteractionResponseFollowup::new().content(text),
                )
                .await
                .map(|_| ())
        } else {
            self.interaction
                .create_response(
                    &self.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new().content(text),
                    ),
                )
                .await
        };
        result.map_err(|e| {
            warn!(target = "reply.send", command = %self.interaction.data.name, error = %e, "interaction reply failed");
            ReplyError::Send(e.to_string())
        })
    }
}

/// Every call overwrites the deferred placeholder.
struct DeferredEditChannel {
    http: Arc<Http>,
    interaction: Arc<CommandInteraction>,
}

#[async_trait]
impl ReplyChannel for DeferredEditChannel {
    async fn reply(&self, text: &str) -> Result<(), ReplyError> {
        self.interaction
            .edit_response(&self.http, EditInteractionResponse::new().content(text))
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!(target = "reply.edit", command = %self.interaction.data.name, error = %e, "deferred edit failed");
                ReplyError::Send(e.to_string())
            })
    }
}

struct DirectMessageChannel {
    http: Arc<Http>,
    user_id: UserId,
}

#[async_trait]
impl ReplyChannel for DirectMessageChannel {
    async fn reply(&self, text: &str) -> Result<(), ReplyError> {
        self.user_id
            .direct_message(&self.http, CreateMessage::new().content(text))
            .await
            .map(|_| ())
            .map_err(|e| ReplyError::Delivery(e.to_string()))
    }
}
