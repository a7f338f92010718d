//! Grounded answer generation
//!
//! The advisor ties retrieval and generation together: retrieve the nearest
//! chunks, format them into a numbered source-labelled context block, and ask
//! the chat model to answer from that context alone. The model's raw text
//! comes back unmodified; retrieval and generation failures propagate to the
//! caller, which owns user-facing presentation.

use crate::api::retriever::{Retriever, ScoredChunk};
use crate::config::Config;
use crate::error::Result;
use crate::provider::{AzureChatClient, AzureEmbeddingClient, ChatProvider};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an expert agricultural advisor for Kenyan farmers. Your role is to provide \
accurate, practical advice based on the agricultural documents provided.

IMPORTANT INSTRUCTIONS:
1. Base your answer ONLY on the provided context
2. If the context doesn't contain enough information to answer, say so clearly
3. Always mention which source(s) your information comes from
4. Give practical, actionable advice when possible
5. Use simple language that farmers can understand";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Question-to-answer pipeline over a loaded index
pub struct Advisor {
    retriever: Retriever,
    chat: Arc<dyn ChatProvider>,
    top_k: usize,
}

impl Advisor {
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatProvider>, top_k: usize) -> Self {
        Self {
            retriever,
            chat,
            top_k,
        }
    }

    /// Build an advisor from configuration: Azure clients plus the index
    /// bundle at the configured location. Clients are created once here and
    /// reused for every question.
    pub fn from_config(config: &Config) -> Result<Self> {
        let embedder = Arc::new(AzureEmbeddingClient::new(&config.azure)?);
        let chat = Arc::new(AzureChatClient::new(&config.azure));
        let retriever = Retriever::open(embedder, &config.paths.index_dir)?;

        Ok(Self::new(retriever, chat, config.retrieval.top_k))
    }

    /// Answer a question from the document corpus.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let retrieved = self.retriever.retrieve(question, self.top_k).await?;
        log::info!(
            "Retrieved {} chunk(s) for question: '{}'",
            retrieved.len(),
            question
        );

        let context = format_context(&retrieved);
        let prompt = build_user_prompt(&context, question);

        self.chat.complete(SYSTEM_PROMPT, &prompt).await
    }

    /// The retriever backing this advisor
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}

/// Format retrieved chunks as a numbered, source-labelled context block.
pub fn format_context(results: &[ScoredChunk]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, scored)| {
            format!(
                "[Source {} - {}, Page {}]\n{}",
                i + 1,
                scored.chunk.source_name(),
                scored.chunk.page_number,
                scored.chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

fn build_user_prompt(context: &str, question: &str) -> String {
    format!(
        "CONTEXT FROM AGRICULTURAL DOCUMENTS:\n{}\n\n---\n\nFARMER'S QUESTION: {}\n\nHELPFUL ANSWER:",
        context, question
    )
}
