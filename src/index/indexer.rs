//! Batched embedding indexer
//!
//! Chunks are embedded in fixed-size batches to stay under provider rate and
//! request-size limits, with a fixed pause between successful batches. A
//! rate-limit failure gets one bounded retry after a longer cooldown; any
//! other failure aborts the run. Batching is purely a quota concern: the
//! finished index is identical to one built from a single unbatched call.

use crate::config::IndexingConfig;
use crate::error::{AdvisorError, Result};
use crate::index::search::VectorIndex;
use crate::index::store::{IndexMetadata, VectorIndexStore};
use crate::provider::{Embedding, EmbeddingProvider};
use crate::text::Chunk;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

/// Builds and persists vector indexes from chunk sets
pub struct EmbeddingIndexer {
    provider: Arc<dyn EmbeddingProvider>,
    config: IndexingConfig,
}

impl EmbeddingIndexer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: IndexingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Embed all chunks and build an in-memory index.
    pub async fn build_index(&self, chunks: &[Chunk]) -> Result<VectorIndex> {
        self.build_index_with_progress(chunks, |_, _| {}).await
    }

    /// Embed all chunks, reporting (embedded, total) after each batch.
    pub async fn build_index_with_progress<F>(
        &self,
        chunks: &[Chunk],
        progress_callback: F,
    ) -> Result<VectorIndex>
    where
        F: Fn(usize, usize),
    {
        if chunks.is_empty() {
            return Err(AdvisorError::Config(
                "no chunks to index".to_string(),
            ));
        }

        let total = chunks.len();
        let batches: Vec<&[Chunk]> = chunks.chunks(self.config.batch_size).collect();
        let batch_count = batches.len();

        log::info!(
            "Embedding {} chunk(s) in {} batch(es) of up to {}",
            total,
            batch_count,
            self.config.batch_size
        );

        let mut index: Option<VectorIndex> = None;
        let mut embedded = 0usize;

        for (batch_number, batch) in batches.into_iter().enumerate() {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
            let vectors = self.embed_batch_with_retry(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(AdvisorError::Embedding(format!(
                    "batch {} returned {} vectors for {} chunks",
                    batch_number + 1,
                    vectors.len(),
                    batch.len()
                )));
            }

            // The first batch fixes the index dimension for the whole run.
            match index.as_mut() {
                Some(existing) => existing.append_batch(vectors, batch.to_vec())?,
                None => {
                    let dimension = vectors
                        .first()
                        .map(Vec::len)
                        .filter(|&d| d > 0)
                        .ok_or_else(|| {
                            AdvisorError::Embedding(
                                "provider returned an empty embedding vector".to_string(),
                            )
                        })?;
                    let mut created = VectorIndex::new(dimension);
                    created.append_batch(vectors, batch.to_vec())?;
                    index = Some(created);
                }
            }
            embedded += batch.len();
            progress_callback(embedded, total);
            log::info!(
                "Embedded batch {}/{} ({}/{} chunks)",
                batch_number + 1,
                batch_count,
                embedded,
                total
            );

            if batch_number + 1 < batch_count && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        // chunks is non-empty, so the first batch always set the index.
        index.ok_or_else(|| AdvisorError::Config("no chunks to index".to_string()))
    }

    /// Build the index and persist it to `location`, replacing any prior
    /// bundle there.
    pub async fn build_and_save(&self, chunks: &[Chunk], location: &Path) -> Result<VectorIndex> {
        self.build_and_save_with_progress(chunks, location, |_, _| {})
            .await
    }

    /// Build-and-save variant reporting (embedded, total) after each batch.
    pub async fn build_and_save_with_progress<F>(
        &self,
        chunks: &[Chunk],
        location: &Path,
        progress_callback: F,
    ) -> Result<VectorIndex>
    where
        F: Fn(usize, usize),
    {
        let index = self
            .build_index_with_progress(chunks, progress_callback)
            .await?;

        let metadata = IndexMetadata {
            embedding_deployment: self.provider.fingerprint(),
            dimension: index.dimension(),
            chunk_count: index.len(),
            created_at: Utc::now(),
        };
        VectorIndexStore::save(&index, &metadata, location)?;

        Ok(index)
    }

    /// Embed one batch, retrying exactly once after the fixed cooldown when
    /// the provider signals a rate limit. Any other failure, and any failure
    /// of the retry itself, propagates.
    async fn embed_batch_with_retry(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        match self.provider.embed_batch(texts).await {
            Ok(vectors) => Ok(vectors),
            Err(error) if error.is_rate_limit() => {
                log::warn!(
                    "Rate limited ({}); cooling down for {:?} before the single retry",
                    error,
                    self.config.rate_limit_cooldown
                );
                if !self.config.rate_limit_cooldown.is_zero() {
                    tokio::time::sleep(self.config.rate_limit_cooldown).await;
                }
                self.provider.embed_batch(texts).await
            }
            Err(error) => Err(error),
        }
    }
}
