use cubebot::config::Settings;
use cubebot::handler::Handler;
use cubebot::{Dispatcher, ShardManagerContainer, cards};
use serenity::model::gateway::GatewayIntents;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    cubebot::init_tracing();

    std::panic::set_hook(Box::new(|info| {
        error!(target = "panic", %info, "unhandled panic");
    }));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(target = "startup", error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(target = "startup", prefix = %settings.prefix, source = ?settings.source, guild = ?settings.guild_id, "starting");

    let source = cards::from_settings(reqwest::Client::new(), &settings.source);
    let dispatcher = Arc::new(Dispatcher::new(source, settings.prefix.clone()));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        dispatcher,
        allowed_guild_id: settings.guild_id.map(GuildId::new),
    };
    let mut client = match Client::builder(&settings.discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!(target = "startup", error = %e, "error creating the Discord client");
            std::process::exit(1);
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    if let Err(e) = client.start().await {
        error!(target = "startup", error = %e, "client error");
        std::process::exit(1);
    }
}
