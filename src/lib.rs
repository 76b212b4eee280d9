// Library entry so the binaries and integration tests share one module tree.
pub mod cards;
pub mod chunk;
pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod model;
pub mod reply;

pub use dispatch::Dispatcher;
pub use model::ShardManagerContainer;

/// `RUST_LOG` filter, defaulting to `info` with serenity's chatter turned down.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,serenity=warn,h2=warn,hyper=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
