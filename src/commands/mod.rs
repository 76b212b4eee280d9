// src/commands/mod.rs
// Command table: names, aliases, parameter schemas and slash registration.

pub mod buylist;
pub mod help;
pub mod pack;
pub mod params;
pub mod ping;
pub mod preview;
pub mod status;

use crate::cards::{CardRecord, CardSource};
use crate::constants::{PACK_DEFAULT_SIZE, PACK_MAX_SIZE, PACK_MIN_SIZE};
use crate::context::CommandContext;
use crate::error::{CommandError, FetchError};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Ping,
    Help,
    List,
    Buylist,
    Status,
    Pack,
}

impl FromStr for CommandKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ping" => Ok(Self::Ping),
            "help" | "h" => Ok(Self::Help),
            "list" | "cube" | "sheet" => Ok(Self::List),
            "buylist" => Ok(Self::Buylist),
            "status" => Ok(Self::Status),
            "pack" => Ok(Self::Pack),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text. As the last parameter of a text command it takes the rest of the line.
    Text,
    Integer { min: i64, max: i64 },
}

#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    /// How the parameter is referred to in usage hints.
    pub label: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<i64>,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub name: &'static str,
    /// Extra names accepted for both trigger styles.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    /// Slash invocations must be deferred before the handler runs because
    /// the handler waits on the card source.
    pub defer: bool,
}

const PACK_COUNT: ParamSpec = ParamSpec {
    name: "count",
    label: "count",
    description: "Number of cards in the pack (1-50, default: 15)",
    kind: ParamKind::Integer {
        min: PACK_MIN_SIZE,
        max: PACK_MAX_SIZE,
    },
    required: false,
    default: Some(PACK_DEFAULT_SIZE),
};

const CARD_NAME: ParamSpec = ParamSpec {
    name: "name",
    label: "card name",
    description: "The name of the card to check",
    kind: ParamKind::Text,
    required: true,
    default: None,
};

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Ping,
        name: "ping",
        aliases: &[],
        description: "Check bot latency",
        params: &[],
        defer: false,
    },
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        aliases: &[],
        description: "Show all available commands",
        params: &[],
        defer: false,
    },
    CommandSpec {
        kind: CommandKind::List,
        name: "list",
        aliases: &["cube", "sheet"],
        description: "Read all card data (preview only)",
        params: &[],
        defer: true,
    },
    CommandSpec {
        kind: CommandKind::Buylist,
        name: "buylist",
        aliases: &[],
        description: "Show cards that are not owned (sends full list via DM)",
        params: &[],
        defer: true,
    },
    CommandSpec {
        kind: CommandKind::Status,
        name: "status",
        aliases: &[],
        description: "Check the status of a specific card",
        params: &[CARD_NAME],
        defer: true,
    },
    CommandSpec {
        kind: CommandKind::Pack,
        name: "pack",
        aliases: &[],
        description: "Generate a random pack of cards",
        params: &[PACK_COUNT],
        defer: true,
    },
];

/// Resolve a typed command word or slash command name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    let kind = CommandKind::from_str(name).ok()?;
    COMMANDS.iter().find(|c| c.kind == kind)
}

/// Primary command names, in table order.
pub fn all_command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|c| c.name).collect()
}

impl CommandSpec {
    /// `<card name>` / `[count]` style argument synopsis.
    pub fn synopsis(&self) -> String {
        self.params
            .iter()
            .map(|p| {
                if p.required {
                    format!(" <{}>", p.label)
                } else {
                    format!(" [{}]", p.label)
                }
            })
            .collect()
    }

    pub fn usage(&self, sigil: &str) -> String {
        format!("`{sigil}{}{}`", self.name, self.synopsis())
    }

    /// Slash definitions: one per name and alias, all sharing the same options.
    pub fn register(&self) -> Vec<CreateCommand> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .map(|name| {
                self.params.iter().fold(
                    CreateCommand::new(name).description(self.description),
                    |cmd, p| {
                        let kind = match p.kind {
                            ParamKind::Text => CommandOptionType::String,
                            ParamKind::Integer { .. } => CommandOptionType::Integer,
                        };
                        cmd.add_option(
                            CreateCommandOption::new(kind, p.name, p.description)
                                .required(p.required),
                        )
                    },
                )
            })
            .collect()
    }
}

/// Every slash command the bot answers to.
pub fn register_all() -> Vec<CreateCommand> {
    COMMANDS.iter().flat_map(CommandSpec::register).collect()
}

/// Fetch the catalog for a command. Configuration gaps, upstream failures
/// and an empty catalog are answered here; `Ok(None)` means the user already
/// has a reply and the command should stop.
pub(crate) async fn fetch_cards(
    ctx: &CommandContext,
    source: &dyn CardSource,
    command: &'static str,
    failure: &str,
) -> Result<Option<Vec<CardRecord>>, CommandError> {
    match source.fetch_records().await {
        Ok(cards) if cards.is_empty() => {
            ctx.reply("❌ No cards found in the catalog.").await?;
            Ok(None)
        }
        Ok(cards) => Ok(Some(cards)),
        Err(FetchError::NotConfigured(var)) => {
            tracing::warn!(target = "cmd.fetch", command, var, "card source not configured");
            ctx.reply(format!("❌ `{var}` is not configured.")).await?;
            Ok(None)
        }
        Err(e) => {
            tracing::error!(target = "cmd.fetch", command, error = %e, "card fetch failed");
            ctx.reply(failure).await?;
            Ok(None)
        }
    }
}
