//! Reply channel abstraction.
//!
//! Command handlers only see [`ReplyChannel`]. Whether a call posts a new
//! message, edits a deferred interaction response or lands in the invoker's
//! DMs is decided by the platform adapter that built the channel.

use crate::chunk::Chunk;
use crate::error::ReplyError;
use async_trait::async_trait;

#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Send `text` once. Failures are returned, never retried.
    async fn reply(&self, text: &str) -> Result<(), ReplyError>;
}

/// Send `chunks` one call at a time in index order. The first failure aborts
/// the rest and is returned, even if earlier chunks went out.
pub async fn deliver(channel: &dyn ReplyChannel, chunks: &[Chunk]) -> Result<(), ReplyError> {
    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|c| c.index);
    for chunk in ordered {
        channel.reply(&chunk.content).await.inspect_err(|e| {
            tracing::debug!(target = "reply.deliver", index = chunk.index, total = chunks.len(), error = %e, "chunk delivery failed");
        })?;
    }
    Ok(())
}
