//! Configuration for crop-advisor
//!
//! Provider credentials come from the environment (loaded via dotenv in the
//! binary); everything else carries defaults that the CLI can override.

use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Azure OpenAI connection settings, one deployment per capability.
///
/// All five values are required; validation happens before any file or
/// network I/O so a misconfigured process fails immediately.
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// API key for the resource
    pub api_key: String,
    /// API version query parameter, e.g. `2024-02-01`
    pub api_version: String,
    /// Deployment name of the chat model
    pub chat_deployment: String,
    /// Deployment name of the embedding model
    pub embedding_deployment: String,
}

impl AzureOpenAiConfig {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| -> String {
            match std::env::var(name) {
                Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let config = Self {
            endpoint: read("AZURE_OPENAI_ENDPOINT"),
            api_key: read("AZURE_OPENAI_API_KEY"),
            api_version: read("AZURE_OPENAI_API_VERSION"),
            chat_deployment: read("AZURE_OPENAI_CHAT_DEPLOYMENT"),
            embedding_deployment: read("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT"),
        };

        if !missing.is_empty() {
            return Err(AdvisorError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(config)
    }
}

/// Configuration for splitting page text into chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Reject degenerate parameter combinations before any splitting starts.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AdvisorError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AdvisorError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Configuration for the batched embedding indexer
#[derive(Debug, Clone)]
pub struct IndexingConfig {
    /// Number of chunks sent per embedding request
    pub batch_size: usize,
    /// Fixed pause between successful batches
    pub batch_delay: Duration,
    /// Cooldown before the single retry after a rate limit
    pub rate_limit_cooldown: Duration,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            batch_delay: Duration::from_secs(5),
            rate_limit_cooldown: Duration::from_secs(60),
        }
    }
}

impl IndexingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(AdvisorError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for query-time retrieval
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of nearest chunks fed to the language model
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Fixed filesystem locations under the data root
#[derive(Debug, Clone)]
pub struct DataPaths {
    /// Directory holding the PDF corpus
    pub pdf_dir: PathBuf,
    /// Directory holding the persisted vector index bundle
    pub index_dir: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("data/pdfs"),
            index_dir: PathBuf::from("data/index"),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub azure: AzureOpenAiConfig,
    pub chunking: ChunkingConfig,
    pub indexing: IndexingConfig,
    pub retrieval: RetrievalConfig,
    pub paths: DataPaths,
}

impl Config {
    /// Build a configuration with provider credentials from the environment
    /// and defaults for everything else.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            azure: AzureOpenAiConfig::from_env()?,
            chunking: ChunkingConfig::default(),
            indexing: IndexingConfig::default(),
            retrieval: RetrievalConfig::default(),
            paths: DataPaths::default(),
        })
    }
}
