// Moderation provider trait — the swap-ready abstraction.
//
// The external classifier is an opaque oracle: anything that can turn a
// message into a labeled verdict with a confidence. Implementations are
// async because providers sit behind HTTP APIs.

use anyhow::Result;
use async_trait::async_trait;

use crate::fusion::ModerationDecision;

/// Trait for obtaining an external moderation verdict for one message.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Produce a verdict for the raw (un-normalized) message text.
    async fn moderate(&self, text: &str) -> Result<ModerationDecision>;
}
