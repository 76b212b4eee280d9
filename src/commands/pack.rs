use super::fetch_cards;
use crate::cards::{self, CardRecord, CardSource};
use crate::constants::{MESSAGE_LIMIT, NO_STATUS, PACK_DEFAULT_SIZE};
use crate::context::CommandContext;
use crate::error::CommandError;

fn pack_line(position: usize, c: &CardRecord) -> String {
    let status = if c.status.is_empty() {
        NO_STATUS
    } else {
        c.status.as_str()
    };
    format!(
        "{}. **{}** (MV: {}) - {} | {} [{}]",
        position, c.name, c.mana_value, c.category, c.attribute, status
    )
}

fn more_marker(hidden: usize) -> String {
    format!("\n\n... and {hidden} more")
}

/// One message: as many numbered lines as fit under the message limit, then
/// a count of the rest.
pub fn format_pack(pack: &[CardRecord]) -> String {
    let mut out = format!("🎲 **Random Pack** - {} cards:\n\n", pack.len());
    let mut used = out.chars().count();
    let mut shown = 0;
    for (i, card) in pack.iter().enumerate() {
        let line = pack_line(i + 1, card);
        let sep = if i == 0 { "" } else { "\n" };
        let after = used + sep.len() + line.chars().count();
        let hidden = pack.len() - i - 1;
        let reserve = if hidden == 0 {
            0
        } else {
            more_marker(hidden).chars().count()
        };
        if after + reserve > MESSAGE_LIMIT {
            break;
        }
        out.push_str(sep);
        out.push_str(&line);
        used = after;
        shown += 1;
    }
    if shown < pack.len() {
        out.push_str(&more_marker(pack.len() - shown));
    }
    out
}

pub async fn run(ctx: &CommandContext, source: &dyn CardSource) -> Result<(), CommandError> {
    let count = ctx.args.integer("count").unwrap_or(PACK_DEFAULT_SIZE).max(0) as usize;

    let Some(cards) = fetch_cards(
        ctx,
        source,
        "pack",
        "❌ Failed to generate pack. Please try again.",
    )
    .await?
    else {
        return Ok(());
    };

    // ThreadRng is !Send; keep it out of scope across the await below.
    let pack = {
        let mut rng = rand::rng();
        cards::sample_pack(cards, count, &mut rng)
    };
    ctx.reply(format_pack(&pack)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card;

    #[test]
    fn pack_lists_every_card_numbered() {
        let text = format_pack(&[card("Bolt", "owned"), card("Shock", "")]);
        assert_eq!(
            text,
            "🎲 **Random Pack** - 2 cards:\n\n1. **Bolt** (MV: 1) - Instant | Red [owned]\n2. **Shock** (MV: 1) - Instant | Red [no status]"
        );
    }

    #[test]
    fn full_pack_of_long_cards_fits_one_message() {
        let pack: Vec<CardRecord> = (0..50)
            .map(|i| CardRecord {
                mana_value: 5,
                name: format!("Kaervek the Merciless {i}"),
                category: "Legendary Creature — Human Shaman".into(),
                attribute: "Black, Red".into(),
                collection: "Invasion".into(),
                status: "Ordered".into(),
            })
            .collect();
        let text = format_pack(&pack);
        assert!(text.chars().count() <= MESSAGE_LIMIT);
        assert!(text.starts_with("🎲 **Random Pack** - 50 cards:"));
        assert!(text.contains("1. **Kaervek the Merciless 0**"));

        let shown = text.lines().filter(|l| l.contains("**Kaervek")).count();
        assert!(shown > 0 && shown < 50);
        assert!(text.ends_with(&format!("... and {} more", 50 - shown)));
    }
}
