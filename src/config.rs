//! Runtime settings read from the environment (`.env` is loaded by the binaries).

use crate::constants::{DEFAULT_PREFIX, DEFAULT_SHEET_RANGE};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub application_id: Option<u64>,
    /// When set, slash commands are registered to this guild on ready and
    /// prefix commands from other guilds are ignored.
    pub guild_id: Option<u64>,
    pub prefix: String,
    pub source: SourceSettings,
}

#[derive(Debug, Clone)]
pub enum SourceSettings {
    Sheets(SheetsSettings),
    CubeCobra { cube_id: String },
    /// No usable source; commands answer that this variable is not configured.
    Unconfigured(&'static str),
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub range: String,
    pub auth: SheetAuth,
}

#[derive(Clone)]
pub enum SheetAuth {
    ApiKey(String),
    ServiceAccount { email: String, private_key: String },
}

impl std::fmt::Debug for SheetAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::ServiceAccount { email, .. } => {
                f.debug_struct("ServiceAccount").field("email", email).finish_non_exhaustive()
            }
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let application_id = match get("APPLICATION_ID") {
            Some(v) => Some(parse_id("APPLICATION_ID", &v)?),
            None => get("CLIENT_ID").map(|v| parse_id("CLIENT_ID", &v)).transpose()?,
        };
        let guild_id = get("GUILD_ID").map(|v| parse_id("GUILD_ID", &v)).transpose()?;
        let prefix = get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let source = SourceSettings::from_lookup(&get)?;

        Ok(Self {
            discord_token,
            application_id,
            guild_id,
            prefix,
            source,
        })
    }
}

impl SourceSettings {
    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let kind = match get("CARD_SOURCE") {
            Some(kind) => kind.to_lowercase(),
            None if get("CUBECOBRA_ID").is_some() => "cubecobra".to_string(),
            None if get("SPREADSHEET_ID").is_some() => "sheets".to_string(),
            None => return Ok(Self::Unconfigured("SPREADSHEET_ID")),
        };

        match kind.as_str() {
            "cubecobra" | "cube" => Ok(match get("CUBECOBRA_ID") {
                Some(cube_id) => Self::CubeCobra { cube_id },
                None => Self::Unconfigured("CUBECOBRA_ID"),
            }),
            "sheets" | "sheet" => {
                let Some(spreadsheet_id) = get("SPREADSHEET_ID") else {
                    return Ok(Self::Unconfigured("SPREADSHEET_ID"));
                };
                let auth = match (
                    get("GOOGLE_API_KEY"),
                    get("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
                    get("GOOGLE_PRIVATE_KEY"),
                ) {
                    (_, Some(email), Some(key)) => SheetAuth::ServiceAccount {
                        email,
                        private_key: key.replace("\\n", "\n"),
                    },
                    (Some(key), _, _) => SheetAuth::ApiKey(key),
                    _ => return Ok(Self::Unconfigured("GOOGLE_SERVICE_ACCOUNT_EMAIL")),
                };
                Ok(Self::Sheets(SheetsSettings {
                    spreadsheet_id,
                    range: get("SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
                    auth,
                }))
            }
            other => Err(ConfigError::Invalid {
                var: "CARD_SOURCE",
                reason: format!("unknown source `{other}` (expected `sheets` or `cubecobra`)"),
            }),
        }
    }
}

/// Discord snowflakes are never zero; serenity's id constructors panic on it.
fn parse_id(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "must be non-zero".to_string(),
        }),
        Ok(id) => Ok(id),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
