//! Document ingestion for crop-advisor
//!
//! This module loads PDF corpora into page records and splits them into
//! overlapping chunks ready for embedding.

pub mod chunking;
pub mod pdf;

// Re-export main types
pub use chunking::{Chunk, DocumentSplitter, PageRecord};
pub use pdf::DocumentLoader;
