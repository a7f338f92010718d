//! API layer for crop-advisor
//!
//! This module provides the main public interfaces for retrieving chunks and
//! answering questions over an indexed corpus.

pub mod advisor;
pub mod retriever;
pub mod session;

// Re-export main API types
pub use advisor::{Advisor, format_context};
pub use retriever::{Retriever, ScoredChunk};
