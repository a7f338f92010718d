//! Vector indexing for crop-advisor
//!
//! This module turns embedded chunks into a searchable index, persists it as
//! a self-contained directory bundle, and loads it back for serving.

pub mod indexer;
pub mod search;
pub mod store;

// Re-export main types
pub use indexer::EmbeddingIndexer;
pub use search::{SearchResult, VectorIndex};
pub use store::{IndexMetadata, VectorIndexStore};
