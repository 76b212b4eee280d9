//! Static help listing built from the command table.

use super::COMMANDS;
use crate::context::CommandContext;
use crate::error::CommandError;

/// The help message. Listed with slash syntax; the footer points at the text prefix.
pub fn help_text(prefix: &str) -> String {
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|c| {
            let aliases = if c.aliases.is_empty() {
                String::new()
            } else {
                let names: Vec<String> = c.aliases.iter().map(|a| format!("/{a}")).collect();
                format!(" (also {})", names.join(", "))
            };
            format!("**/{}{}** - {}{}", c.name, c.synopsis(), c.description, aliases)
        })
        .collect();

    format!(
        "**📖 Available Commands**\n\n{}\n\n*All commands also work as text commands with the bot prefix (e.g. {prefix}ping, {prefix}pack 5)*",
        lines.join("\n")
    )
}

pub async fn run(ctx: &CommandContext) -> Result<(), CommandError> {
    ctx.reply(help_text(&ctx.text_prefix)).await?;
    Ok(())
}
