//! Query-time chunk retrieval
//!
//! A retriever owns a loaded, read-only index and the embedding provider the
//! corpus was embedded with. Opening a saved bundle validates the stored
//! embedding fingerprint against the active provider so a mismatched
//! configuration fails loudly instead of returning meaningless neighbors.

use crate::error::{AdvisorError, Result};
use crate::index::search::VectorIndex;
use crate::index::store::{IndexMetadata, VectorIndexStore};
use crate::provider::EmbeddingProvider;
use crate::text::Chunk;
use std::path::Path;
use std::sync::Arc;

/// A retrieved chunk with its distance to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Cosine distance to the query embedding (lower is more similar)
    pub distance: f32,
    /// The retrieved chunk
    pub chunk: Chunk,
}

/// Nearest-chunk retrieval over a loaded index
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    metadata: IndexMetadata,
}

impl Retriever {
    /// Open a saved index bundle for retrieval. Fails if the bundle is
    /// missing or corrupt, or if it was built with a different embedding
    /// deployment than the provider in hand.
    pub fn open(provider: Arc<dyn EmbeddingProvider>, location: &Path) -> Result<Self> {
        let (index, metadata) = VectorIndexStore::load(location)?;

        let active = provider.fingerprint();
        if metadata.embedding_deployment != active {
            return Err(AdvisorError::Config(format!(
                "index was built with embedding deployment '{}' but the active configuration uses '{}'; re-run indexing",
                metadata.embedding_deployment, active
            )));
        }

        log::info!(
            "Retriever ready: {} chunk(s), dimension {}, deployment '{}'",
            index.len(),
            index.dimension(),
            metadata.embedding_deployment
        );

        Ok(Self {
            provider,
            index,
            metadata,
        })
    }

    /// Assemble a retriever from an already-built index. Used by indexing
    /// smoke checks and tests; `open` is the serving path.
    pub fn from_parts(
        provider: Arc<dyn EmbeddingProvider>,
        index: VectorIndex,
        metadata: IndexMetadata,
    ) -> Self {
        Self {
            provider,
            index,
            metadata,
        }
    }

    /// Return the `k` chunks nearest to the query, nearest first. A `k`
    /// beyond the corpus size returns every chunk.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.provider.embed_one(query).await?;
        let results = self.index.search(&query_embedding, k)?;

        let scored = results
            .into_iter()
            .filter_map(|result| {
                self.index.chunk(result.id).map(|chunk| ScoredChunk {
                    distance: result.distance,
                    chunk: chunk.clone(),
                })
            })
            .collect();

        Ok(scored)
    }

    /// Number of retrievable chunks
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Metadata of the loaded index bundle
    pub fn metadata(&self) -> &IndexMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Embedding;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::path::PathBuf;

    /// Axis-aligned stand-in: "locusts" embeds on the first axis, "soil" on
    /// the second, anything else on the third.
    struct AxisProvider;

    #[async_trait]
    impl EmbeddingProvider for AxisProvider {
        fn fingerprint(&self) -> String {
            "axis".to_string()
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let text = text.to_lowercase();
                    if text.contains("locust") {
                        vec![1.0, 0.0, 0.0]
                    } else if text.contains("soil") {
                        vec![0.0, 1.0, 0.0]
                    } else {
                        vec![0.0, 0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn chunk(text: &str, page: u32) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_path: PathBuf::from("/data/pdfs/handbook.pdf"),
            page_number: page,
        }
    }

    fn metadata(deployment: &str, count: usize) -> IndexMetadata {
        IndexMetadata {
            embedding_deployment: deployment.to_string(),
            dimension: 3,
            chunk_count: count,
            created_at: Utc::now(),
        }
    }

    async fn build_retriever() -> Retriever {
        let provider = Arc::new(AxisProvider);
        let chunks = vec![
            chunk("Locusts can be controlled by early spraying", 1),
            chunk("Prepare soil with compost before planting", 2),
            chunk("Harvest maize when husks turn brown", 3),
        ];
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = provider.embed_batch(&texts).await.unwrap();

        let mut index = VectorIndex::new(3);
        index.append_batch(vectors, chunks).unwrap();

        Retriever::from_parts(provider, index, metadata("axis", 3))
    }

    #[tokio::test]
    async fn test_retrieve_nearest_first() {
        let retriever = build_retriever().await;
        let results = retriever.retrieve("how do I stop locusts", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.text.contains("Locusts"));
        assert!(results[0].distance < results[1].distance);
    }

    #[tokio::test]
    async fn test_k_beyond_corpus_returns_all() {
        let retriever = build_retriever().await;
        let results = retriever.retrieve("soil", 50).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_open_rejects_fingerprint_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = VectorIndex::new(3);
        index
            .append_batch(vec![vec![1.0, 0.0, 0.0]], vec![chunk("anything", 1)])
            .unwrap();
        VectorIndexStore::save(&index, &metadata("some-other-deployment", 1), dir.path())
            .unwrap();

        let result = Retriever::open(Arc::new(AxisProvider), dir.path());
        assert!(matches!(result, Err(AdvisorError::Config(_))));
    }

    #[tokio::test]
    async fn test_open_missing_bundle_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Retriever::open(Arc::new(AxisProvider), &dir.path().join("absent"));
        assert!(matches!(result, Err(AdvisorError::IndexNotFound(_))));
    }
}
