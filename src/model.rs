//! Shared state stored in serenity's `TypeMap`.

use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;

/// Gives event handlers access to per-shard heartbeat latency.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}
