//! `buylist`: full list of unowned cards by DM, short preview in channel.

use super::fetch_cards;
use crate::cards::{self, CardRecord, CardSource};
use crate::chunk::{BodyWrapper, Chunk, chunk};
use crate::constants::{BUYLIST_PREVIEW_LEN, DM_REMEDIATION, MESSAGE_LIMIT, NO_STATUS};
use crate::context::CommandContext;
use crate::error::{CommandError, ReplyError};
use crate::reply::deliver;
use tracing::{debug, warn};

fn format_preview(buylist: &[CardRecord]) -> String {
    buylist
        .iter()
        .take(BUYLIST_PREVIEW_LEN)
        .enumerate()
        .map(|(i, c)| {
            let status = if c.status.is_empty() {
                format!(" [{NO_STATUS}]")
            } else {
                format!(" [{}]", c.status)
            };
            format!(
                "{}. **{}** (MV: {}) - {} | {}{}",
                i + 1,
                c.name,
                c.mana_value,
                c.category,
                c.attribute,
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn header(count: usize) -> String {
    format!("🛒 **Buylist** - {count} cards needed:\n")
}

/// The DM payload: every card on its own line inside a code block, split
/// at the message limit.
pub fn dm_chunks(buylist: &[CardRecord]) -> Vec<Chunk> {
    let lines: Vec<String> = buylist
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let status = if c.status.is_empty() { NO_STATUS } else { c.status.as_str() };
            format!(
                "{}. {} (MV: {}) - {} | {} | {} [{}]",
                i + 1,
                c.name,
                c.mana_value,
                c.category,
                c.attribute,
                c.collection,
                status
            )
        })
        .collect();
    chunk(&header(buylist.len()), &lines, BodyWrapper::CodeBlock, MESSAGE_LIMIT)
}

pub fn channel_summary(buylist: &[CardRecord]) -> String {
    let more = if buylist.len() > BUYLIST_PREVIEW_LEN {
        format!("\n\n... and {} more", buylist.len() - BUYLIST_PREVIEW_LEN)
    } else {
        String::new()
    };
    format!(
        "{}\n{}{}\n\n📬 *Full list sent via DM!*",
        header(buylist.len()),
        format_preview(buylist),
        more
    )
}

pub async fn run(ctx: &CommandContext, source: &dyn CardSource) -> Result<(), CommandError> {
    let Some(cards) = fetch_cards(
        ctx,
        source,
        "buylist",
        "❌ Failed to read buylist. Check your source configuration and permissions.",
    )
    .await?
    else {
        return Ok(());
    };

    let buylist = cards::buylist(&cards);
    if buylist.is_empty() {
        ctx.reply("✅ Buylist is empty - you own all cards!").await?;
        return Ok(());
    }
    debug!(target = "cmd.buylist", json = %serde_json::to_string(&buylist).unwrap_or_default(), "buylist snapshot");

    match deliver(ctx.direct.as_ref(), &dm_chunks(&buylist)).await {
        Ok(()) => ctx.reply(channel_summary(&buylist)).await?,
        Err(ReplyError::Delivery(reason)) => {
            warn!(target = "cmd.buylist", user_id = ctx.invoker.id, %reason, "DM rejected");
            ctx.reply(DM_REMEDIATION).await?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
