//! `list` / `cube` / `sheet`: short preview of the whole catalog.

use super::fetch_cards;
use crate::cards::{CardRecord, CardSource};
use crate::constants::LIST_PREVIEW_LEN;
use crate::context::CommandContext;
use crate::error::CommandError;
use tracing::debug;

fn format_preview(cards: &[CardRecord]) -> String {
    cards
        .iter()
        .take(LIST_PREVIEW_LEN)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. **{}** (MV: {}) - {} | {} | {} | {}",
                i + 1,
                c.name,
                c.mana_value,
                c.category,
                c.attribute,
                c.collection,
                c.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(cards: &[CardRecord], overview_url: Option<&str>) -> String {
    let mut out = format!(
        "✅ Found {} cards:\n\n{}",
        cards.len(),
        format_preview(cards)
    );
    if cards.len() > LIST_PREVIEW_LEN {
        out.push_str("\n\n... and more");
    }
    if let Some(url) = overview_url {
        out.push_str(&format!("\n\n🔮 View the full list: {url}"));
    }
    out
}

pub async fn run(ctx: &CommandContext, source: &dyn CardSource) -> Result<(), CommandError> {
    let Some(cards) = fetch_cards(
        ctx,
        source,
        "list",
        "❌ Failed to read card data. Check your source configuration and permissions.",
    )
    .await?
    else {
        return Ok(());
    };

    debug!(target = "cmd.list", json = %serde_json::to_string(&cards).unwrap_or_default(), "catalog snapshot");
    ctx.reply(render(&cards, source.overview_url().as_deref())).await?;
    Ok(())
}
