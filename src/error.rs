//! Error types for crop-advisor
//!
//! This module provides error handling for all advisory operations, including
//! PDF ingestion, chunking, embedding, index persistence, and answer generation.

use thiserror::Error;

/// Main error type for advisory operations
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Configuration errors (invalid chunk parameters, missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF processing errors for a single document
    #[error("PDF processing error: {0}")]
    Pdf(String),

    /// Embedding provider signalled a throughput limit (HTTP 429)
    #[error("Rate limited by embedding provider: {0}")]
    RateLimited(String),

    /// Other embedding provider failures
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Persisted index is absent at the expected location
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Persisted index exists but cannot be reconstructed
    #[error("Index corrupt: {0}")]
    IndexCorrupt(String),

    /// Index persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Language model failures during answer generation
    #[error("Generation error: {0}")]
    Generation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenAI API client errors
    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),
}

/// Result type alias for advisory operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    /// Whether this failure kind is recoverable by the indexer's single
    /// bounded retry. Only rate limits qualify; everything else aborts the run.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AdvisorError::RateLimited(_))
    }
}
