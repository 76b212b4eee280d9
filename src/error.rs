//! Error taxonomy for the bot.
//!
//! Every failure is resolved to a user-facing reply at the point it happens;
//! these types only carry enough detail to pick that reply and to log.

use thiserror::Error;

/// A required identifier or credential is missing or unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// The upstream card source could not be read.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source needs an identifier that was never configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected payload: {0}")]
    Decode(String),
}

/// An outbound platform call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// The platform refused a direct message (recipient has DMs disabled, blocked the bot, ...).
    #[error("direct message rejected: {0}")]
    Delivery(String),
    #[error("send failed: {0}")]
    Send(String),
}

/// A user-supplied argument did not match the command's parameter schema.
/// `message` is shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Anything a command handler lets escape. The dispatcher logs it and
/// answers with a generic failure.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Reply(#[from] ReplyError),
}
