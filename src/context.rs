//! Invocation and command context types.
//!
//! An [`Invocation`] is what the platform delivered. A [`CommandContext`] is
//! what a handler gets: validated arguments and reply channels, with no trace
//! of which trigger style produced it.

use crate::reply::ReplyChannel;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStyle {
    /// `!command args` in a channel message.
    Text,
    /// Slash command with typed options.
    Structured,
}

impl TriggerStyle {
    /// The sigil users type for this style, used in usage hints.
    pub fn sigil<'a>(&self, text_prefix: &'a str) -> &'a str {
        match self {
            Self::Text => text_prefix,
            Self::Structured => "/",
        }
    }
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawArgs {
    /// Everything after the command word, trimmed.
    Text(String),
    /// Named options as the platform typed them.
    Options(Vec<(String, ArgValue)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub style: TriggerStyle,
    pub raw: RawArgs,
    pub invoker: Invoker,
}

impl Invocation {
    /// Parse a prefixed text message. Returns `None` when the message does
    /// not start with `prefix` or names no command.
    pub fn from_text(content: &str, prefix: &str, invoker: Invoker) -> Option<Self> {
        let body = content.strip_prefix(prefix)?;
        let body = body.trim_start();
        let (command, rest) = match body.find(char::is_whitespace) {
            Some(at) => body.split_at(at),
            None => (body, ""),
        };
        if command.is_empty() {
            return None;
        }
        Some(Self {
            command: command.to_lowercase(),
            style: TriggerStyle::Text,
            raw: RawArgs::Text(rest.trim().to_string()),
            invoker,
        })
    }

    pub fn structured(
        command: impl Into<String>,
        options: Vec<(String, ArgValue)>,
        invoker: Invoker,
    ) -> Self {
        Self {
            command: command.into(),
            style: TriggerStyle::Structured,
            raw: RawArgs::Options(options),
            invoker,
        }
    }
}

/// Validated arguments keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(HashMap<String, ArgValue>);

impl Args {
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ArgValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(ArgValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a command handler may use. Built once per invocation.
pub struct CommandContext {
    /// Visible reply in the invoking channel.
    pub reply: Box<dyn ReplyChannel>,
    /// Private reply to the invoker.
    pub direct: Box<dyn ReplyChannel>,
    pub invoker: Invoker,
    pub args: Args,
    /// Configured prefix for text commands, for hints that point at them.
    pub text_prefix: String,
    /// Gateway heartbeat latency of the receiving shard, when known.
    pub gateway_latency: Option<Duration>,
}

impl CommandContext {
    pub async fn reply(&self, text: impl AsRef<str>) -> Result<(), crate::error::ReplyError> {
        self.reply.reply(text.as_ref()).await
    }
}
