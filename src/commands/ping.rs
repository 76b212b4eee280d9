use crate::context::CommandContext;
use crate::error::CommandError;
use std::time::Instant;

// Round trip is measured on the placeholder reply; API latency is the shard heartbeat.
pub async fn run(ctx: &CommandContext) -> Result<(), CommandError> {
    let started = Instant::now();
    ctx.reply("Pinging...").await?;
    let round_trip = started.elapsed();

    let api = ctx
        .gateway_latency
        .map_or_else(|| "N/A".to_string(), |l| format!("{}ms", l.as_millis()));
    ctx.reply(format!(
        "🏓 Pong! Latency: {}ms | API: {}",
        round_trip.as_millis(),
        api
    ))
    .await?;
    Ok(())
}
