//! Remote provider boundaries
//!
//! Embedding and chat completion are opaque remote services behind small
//! traits so the pipeline can be exercised against deterministic stand-ins
//! in tests. The production implementations talk to Azure OpenAI.

pub mod chat;
pub mod embedding;

use crate::error::{AdvisorError, Result};
use async_trait::async_trait;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// A batch embedding service with a stable model identity.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the embedding model/deployment behind this provider.
    /// Persisted with the index and validated at load time so a query can
    /// never silently use a different embedding space than the corpus.
    fn fingerprint(&self) -> String;

    /// Embed a batch of texts, returning one vector per input in order.
    /// A provider throughput limit surfaces as [`AdvisorError::RateLimited`].
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Embed a single text (used for queries).
    async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let texts = vec![text.to_string()];
        let mut vectors = self.embed_batch(&texts).await?;
        vectors.pop().ok_or_else(|| {
            AdvisorError::Embedding("provider returned no embedding for input".to_string())
        })
    }
}

/// A single-shot chat completion service.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one completion over a system prompt and a user prompt and return
    /// the model's raw text output unmodified.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// Re-export production clients
pub use chat::AzureChatClient;
pub use embedding::AzureEmbeddingClient;
