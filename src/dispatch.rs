//! Routes an invocation of either trigger style to its command handler.

use crate::cards::CardSource;
use crate::commands::{self, CommandKind, params};
use crate::context::{CommandContext, Invocation, TriggerStyle};
use crate::error::ReplyError;
use crate::reply::ReplyChannel;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

pub const GENERIC_FAILURE: &str = "❌ Something went wrong while running that command. Please try again.";

/// Per-invocation platform adapter: the deferral signal and the reply
/// strategies available for this event.
#[async_trait]
pub trait ReplySurface: Send + Sync {
    /// Tell the platform a reply will follow later. Only called for
    /// structured invocations of deferred commands.
    async fn defer(&self) -> Result<(), ReplyError>;

    /// Visible reply channel; `deferred` selects the edit-the-placeholder strategy.
    fn reply_channel(&self, deferred: bool) -> Box<dyn ReplyChannel>;

    /// Direct message to the invoker.
    fn direct_channel(&self) -> Box<dyn ReplyChannel>;

    fn gateway_latency(&self) -> Option<Duration> {
        None
    }
}

pub struct Dispatcher {
    source: Arc<dyn CardSource>,
    prefix: String,
}

impl Dispatcher {
    pub fn new(source: Arc<dyn CardSource>, prefix: impl Into<String>) -> Self {
        Self {
            source,
            prefix: prefix.into(),
        }
    }

    /// Text-command prefix this dispatcher was configured with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(command = %invocation.command, user_id = invocation.invoker.id, style = ?invocation.style)
    )]
    pub async fn dispatch(&self, invocation: Invocation, surface: &dyn ReplySurface) {
        let Some(spec) = commands::find(&invocation.command) else {
            debug!(target = "dispatch", "no matching command");
            return;
        };

        let deferred = invocation.style == TriggerStyle::Structured && spec.defer;
        if deferred {
            if let Err(e) = surface.defer().await {
                error!(target = "dispatch", command = spec.name, error = %e, "defer failed");
                return;
            }
        }
        let reply = surface.reply_channel(deferred);

        let sigil = invocation.style.sigil(&self.prefix);
        let args = match params::validate(spec, &invocation.raw, sigil) {
            Ok(args) => args,
            Err(invalid) => {
                debug!(target = "dispatch", command = spec.name, reason = %invalid, "invalid arguments");
                if let Err(e) = reply.reply(&invalid.message).await {
                    warn!(target = "dispatch", command = spec.name, error = %e, "usage reply failed");
                }
                return;
            }
        };

        let ctx = CommandContext {
            reply,
            direct: surface.direct_channel(),
            invoker: invocation.invoker,
            args,
            text_prefix: self.prefix.clone(),
            gateway_latency: surface.gateway_latency(),
        };

        let source = self.source.as_ref();
        let result = match spec.kind {
            CommandKind::Ping => commands::ping::run(&ctx).await,
            CommandKind::Help => commands::help::run(&ctx).await,
            CommandKind::List => commands::preview::run(&ctx, source).await,
            CommandKind::Buylist => commands::buylist::run(&ctx, source).await,
            CommandKind::Status => commands::status::run(&ctx, source).await,
            CommandKind::Pack => commands::pack::run(&ctx, source).await,
        };

        if let Err(e) = result {
            error!(target = "dispatch", command = spec.name, error = %e, "command failed");
            if let Err(e) = ctx.reply(GENERIC_FAILURE).await {
                warn!(target = "dispatch", command = spec.name, error = %e, "failure reply failed");
            }
        }
    }
}
