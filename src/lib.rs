//! # crop-advisor
//!
//! Retrieval-augmented crop advisory over a fixed corpus of agricultural PDF
//! documents. PDFs are loaded page-by-page, split into overlapping chunks,
//! embedded in batches, and persisted as a searchable vector index; questions
//! are answered by retrieving the nearest chunks and grounding a chat model
//! on them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crop_advisor::{Config, DocumentLoader, DocumentSplitter, EmbeddingIndexer};
//! use crop_advisor::provider::AzureEmbeddingClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!
//!     // Offline: build the index from a directory of PDFs
//!     let pages = DocumentLoader::load_pdfs(&config.paths.pdf_dir)?;
//!     let chunks = DocumentSplitter::new(config.chunking.clone())?.split(&pages);
//!
//!     let embedder = Arc::new(AzureEmbeddingClient::new(&config.azure)?);
//!     let indexer = EmbeddingIndexer::new(embedder, config.indexing.clone())?;
//!     indexer.build_and_save(&chunks, &config.paths.index_dir).await?;
//!
//!     // Online: answer questions against the persisted index
//!     let advisor = crop_advisor::session::get_or_init(&config).await?;
//!     let answer = advisor.ask("How do I control locusts on my farm?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod provider;
pub mod text;

// Re-export main API types
pub use api::{Advisor, Retriever, ScoredChunk};
pub use api::session;
pub use config::Config;
pub use error::{AdvisorError, Result};
pub use index::{EmbeddingIndexer, IndexMetadata, VectorIndex, VectorIndexStore};
pub use text::{Chunk, DocumentLoader, DocumentSplitter, PageRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_imports() {
        // Ensure all major types can be imported
        let _config = config::ChunkingConfig::default();
        let _paths = config::DataPaths::default();
    }
}
