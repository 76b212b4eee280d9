// Central constants for message limits and command bounds.
pub const MESSAGE_LIMIT: usize = 2000; // Discord per-message character cap
pub const CODE_FENCE: &str = "```";

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_SHEET_RANGE: &str = "List!A:F";

pub const PACK_DEFAULT_SIZE: i64 = 15;
pub const PACK_MIN_SIZE: i64 = 1;
pub const PACK_MAX_SIZE: i64 = 50;

pub const LIST_PREVIEW_LEN: usize = 5;
pub const BUYLIST_PREVIEW_LEN: usize = 10;

pub const OWNED_STATUS: &str = "owned";
pub const UNKNOWN_CARD_NAME: &str = "Unknown";
pub const COLORLESS: &str = "Colorless";
pub const NO_STATUS: &str = "no status";

pub const DM_REMEDIATION: &str = "❌ Could not send DM. Please enable DMs from server members in your privacy settings:\nUser Settings → Privacy & Safety → Allow direct messages from server members";
