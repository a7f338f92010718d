//! In-memory vector index with exact nearest-neighbor search
//!
//! The corpus is small enough that an exact cosine scan over a flat vector
//! table is the whole search story. Chunk ids are positions in the table, so
//! ties in distance resolve in insertion order. The index is built
//! incrementally in batches during indexing and is read-only while serving.

use crate::error::{AdvisorError, Result};
use crate::provider::Embedding;
use crate::text::Chunk;

/// Search result referencing a chunk by id
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Chunk id (position in the index)
    pub id: usize,
    /// Cosine distance to the query (lower is more similar)
    pub distance: f32,
}

/// Flat vector index mapping embeddings to chunks
pub struct VectorIndex {
    vectors: Vec<Embedding>,
    chunks: Vec<Chunk>,
    dimension: usize,
}

impl VectorIndex {
    /// Create an empty index with a fixed vector dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: Vec::new(),
            chunks: Vec::new(),
            dimension,
        }
    }

    /// Reassemble an index from persisted parts, checking internal
    /// consistency. Used by the store when loading a bundle.
    pub fn from_parts(
        vectors: Vec<Embedding>,
        chunks: Vec<Chunk>,
        dimension: usize,
    ) -> Result<Self> {
        if vectors.len() != chunks.len() {
            return Err(AdvisorError::IndexCorrupt(format!(
                "{} vectors but {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(AdvisorError::IndexCorrupt(format!(
                "vector of dimension {} in an index of dimension {}",
                bad.len(),
                dimension
            )));
        }
        Ok(Self {
            vectors,
            chunks,
            dimension,
        })
    }

    /// Append one batch of embedded chunks. Vector ids continue from the
    /// current end of the table, so batched appends and a single bulk append
    /// produce the same index.
    pub fn append_batch(&mut self, vectors: Vec<Embedding>, chunks: Vec<Chunk>) -> Result<()> {
        if vectors.len() != chunks.len() {
            return Err(AdvisorError::Embedding(format!(
                "batch has {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(AdvisorError::Embedding(format!(
                    "vector dimension {} doesn't match index dimension {}",
                    vector.len(),
                    self.dimension
                )));
            }
        }

        self.vectors.extend(vectors);
        self.chunks.extend(chunks);
        Ok(())
    }

    /// Exact nearest-neighbor search by cosine distance, nearest first.
    /// Asking for more results than the index holds returns everything.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimension {
            return Err(AdvisorError::Config(format!(
                "query dimension {} doesn't match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut distances: Vec<SearchResult> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| SearchResult {
                id,
                distance: cosine_distance(query, vector),
            })
            .collect();

        distances.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        distances.truncate(k);

        Ok(distances)
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Fixed vector dimension of this index
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Chunk by id
    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    /// All chunks in id order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// All vectors in id order
    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }
}

/// Cosine distance (1 - cosine similarity)
fn cosine_distance(a: &Embedding, b: &Embedding) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        1.0 // Maximum distance for zero vectors
    } else {
        1.0 - (dot / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_path: PathBuf::from("/data/pdfs/test.pdf"),
            page_number: 1,
        }
    }

    #[test]
    fn test_add_and_search_vectors() {
        let mut index = VectorIndex::new(3);
        index
            .append_batch(
                vec![
                    vec![1.0, 0.0, 0.0],
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                ],
                vec![chunk("first"), chunk("second"), chunk("third")],
            )
            .unwrap();

        let results = index.search(&vec![0.9, 0.1, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 0);
        assert_eq!(index.chunk(results[0].id).unwrap().text, "first");
    }

    #[test]
    fn test_k_beyond_corpus_returns_all() {
        let mut index = VectorIndex::new(2);
        index
            .append_batch(
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                vec![chunk("a"), chunk("b")],
            )
            .unwrap();

        let results = index.search(&vec![1.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_ties_resolve_in_id_order() {
        let mut index = VectorIndex::new(2);
        // Two identical vectors are equidistant from any query.
        index
            .append_batch(
                vec![vec![1.0, 1.0], vec![1.0, 1.0]],
                vec![chunk("a"), chunk("b")],
            )
            .unwrap();

        let results = index.search(&vec![0.5, 0.5], 2).unwrap();
        assert_eq!(results[0].id, 0);
        assert_eq!(results[1].id, 1);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let index = VectorIndex::new(3);
        assert!(matches!(
            index.search(&vec![1.0, 0.0], 1),
            Err(AdvisorError::Config(_))
        ));
    }

    #[test]
    fn test_append_dimension_mismatch() {
        let mut index = VectorIndex::new(3);
        let result = index.append_batch(vec![vec![1.0, 0.0]], vec![chunk("short")]);
        assert!(matches!(result, Err(AdvisorError::Embedding(_))));
    }

    #[test]
    fn test_from_parts_rejects_count_mismatch() {
        let result = VectorIndex::from_parts(vec![vec![1.0]], vec![], 1);
        assert!(matches!(result, Err(AdvisorError::IndexCorrupt(_))));
    }

    #[test]
    fn test_cosine_distance() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];

        // Orthogonal vectors sit at distance 1.
        assert_relative_eq!(cosine_distance(&a, &b), 1.0, epsilon = 1e-6);
        // Identical vectors sit at distance 0.
        assert_relative_eq!(cosine_distance(&a, &a), 0.0, epsilon = 1e-6);
        // Zero vectors are maximally distant.
        assert_relative_eq!(cosine_distance(&a, &vec![0.0, 0.0, 0.0]), 1.0, epsilon = 1e-6);
    }
}
