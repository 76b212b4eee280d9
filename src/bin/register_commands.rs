//! One-shot global slash command registration.
//!
//! Needs `DISCORD_TOKEN` and `APPLICATION_ID` (or `CLIENT_ID`). Exits 1 before
//! touching the network when either is missing.

use anyhow::{Context as _, anyhow};
use cubebot::commands;
use cubebot::config::Settings;
use serenity::http::Http;
use serenity::model::application::Command;
use serenity::model::id::ApplicationId;
use tracing::{error, info};

async fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("reading configuration")?;
    let application_id = settings
        .application_id
        .ok_or_else(|| anyhow!("missing required environment variable APPLICATION_ID"))?;

    let http = Http::new(&settings.discord_token);
    http.set_application_id(ApplicationId::new(application_id));

    let definitions = commands::register_all();
    info!(target = "register", count = definitions.len(), "registering global commands");
    let registered = Command::set_global_commands(&http, definitions)
        .await
        .context("registering global commands")?;
    for command in &registered {
        info!(target = "register", name = %command.name, id = command.id.get(), "registered");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    cubebot::init_tracing();

    if let Err(e) = run().await {
        error!(target = "register", error = %format_args!("{e:#}"), "command registration failed");
        std::process::exit(1);
    }
}
