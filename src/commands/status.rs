use super::fetch_cards;
use crate::cards::{self, CardRecord, CardSource};
use crate::constants::NO_STATUS;
use crate::context::CommandContext;
use crate::error::CommandError;

pub fn format_card(card: &CardRecord) -> String {
    let status = if card.status.is_empty() {
        NO_STATUS
    } else {
        card.status.as_str()
    };
    format!(
        "**{}**\nMV: {}\nType: {}\nColor: {}\nSet: {}\nStatus: **{}**",
        card.name, card.mana_value, card.category, card.attribute, card.collection, status
    )
}

pub async fn run(ctx: &CommandContext, source: &dyn CardSource) -> Result<(), CommandError> {
    // Validated as required + non-blank before we get here.
    let name = ctx.args.text("name").unwrap_or_default();

    let Some(cards) = fetch_cards(
        ctx,
        source,
        "status",
        "❌ Failed to check card status. Please try again.",
    )
    .await?
    else {
        return Ok(());
    };

    match cards::find_by_name(&cards, name) {
        Some(card) => ctx.reply(format_card(card)).await?,
        None => ctx.reply(format!("❌ **{name}** is not on the list.")).await?,
    }
    Ok(())
}
