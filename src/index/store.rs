//! Index bundle persistence
//!
//! A saved index is a self-contained directory bundle: the vector table
//! (bincode), the chunk records (JSON), and a metadata sidecar carrying the
//! embedding-config fingerprint. Loading reconstructs an index functionally
//! equivalent to the saved one or fails loudly; a missing bundle is never
//! papered over with an empty index.
//!
//! Bundles are trusted because they are always self-produced. This is a
//! closed-world assumption: the loader validates structural consistency,
//! not provenance, and must not be pointed at bundles from other sources.

use crate::error::{AdvisorError, Result};
use crate::index::search::VectorIndex;
use crate::provider::Embedding;
use crate::text::Chunk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const VECTORS_FILE: &str = "vectors.bin";
const CHUNKS_FILE: &str = "chunks.json";
const META_FILE: &str = "meta.json";

/// Metadata persisted alongside the vector table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexMetadata {
    /// Embedding deployment the corpus was embedded with. Validated against
    /// the active configuration when the bundle is opened for retrieval.
    pub embedding_deployment: String,
    /// Vector dimension fixed by the embedding provider
    pub dimension: usize,
    /// Number of indexed chunks
    pub chunk_count: usize,
    /// When the bundle was written
    pub created_at: DateTime<Utc>,
}

/// Save/load operations for index bundles
pub struct VectorIndexStore;

impl VectorIndexStore {
    /// Persist an index and its metadata to `location`, unconditionally
    /// replacing any bundle already there.
    pub fn save(index: &VectorIndex, metadata: &IndexMetadata, location: &Path) -> Result<()> {
        std::fs::create_dir_all(location)?;

        let vector_data = bincode::serialize(index.vectors())
            .map_err(|e| AdvisorError::Storage(format!("failed to serialize vectors: {}", e)))?;
        std::fs::write(location.join(VECTORS_FILE), vector_data)?;

        let chunk_data = serde_json::to_string(index.chunks())?;
        std::fs::write(location.join(CHUNKS_FILE), chunk_data)?;

        let meta_data = serde_json::to_string_pretty(metadata)?;
        std::fs::write(location.join(META_FILE), meta_data)?;

        log::info!(
            "Saved index bundle with {} chunk(s) to {}",
            index.len(),
            location.display()
        );
        Ok(())
    }

    /// Load a bundle back into an index. An absent location is
    /// [`AdvisorError::IndexNotFound`]; unreadable or internally inconsistent
    /// content is [`AdvisorError::IndexCorrupt`].
    pub fn load(location: &Path) -> Result<(VectorIndex, IndexMetadata)> {
        for file in [VECTORS_FILE, CHUNKS_FILE, META_FILE] {
            if !location.join(file).exists() {
                return Err(AdvisorError::IndexNotFound(format!(
                    "no index bundle at {} (missing {})",
                    location.display(),
                    file
                )));
            }
        }

        let meta_data = std::fs::read_to_string(location.join(META_FILE))?;
        let metadata: IndexMetadata = serde_json::from_str(&meta_data)
            .map_err(|e| AdvisorError::IndexCorrupt(format!("unreadable metadata: {}", e)))?;

        let vector_data = std::fs::read(location.join(VECTORS_FILE))?;
        let vectors: Vec<Embedding> = bincode::deserialize(&vector_data)
            .map_err(|e| AdvisorError::IndexCorrupt(format!("unreadable vector table: {}", e)))?;

        let chunk_data = std::fs::read_to_string(location.join(CHUNKS_FILE))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&chunk_data)
            .map_err(|e| AdvisorError::IndexCorrupt(format!("unreadable chunk records: {}", e)))?;

        if vectors.len() != metadata.chunk_count || chunks.len() != metadata.chunk_count {
            return Err(AdvisorError::IndexCorrupt(format!(
                "metadata says {} chunks, bundle holds {} vectors and {} chunks",
                metadata.chunk_count,
                vectors.len(),
                chunks.len()
            )));
        }

        let index = VectorIndex::from_parts(vectors, chunks, metadata.dimension)?;

        log::info!(
            "Loaded index bundle with {} chunk(s) from {}",
            index.len(),
            location.display()
        );
        Ok((index, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_index() -> (VectorIndex, IndexMetadata) {
        let mut index = VectorIndex::new(3);
        index
            .append_batch(
                vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
                vec![
                    Chunk {
                        text: "Locusts can be controlled by early spraying".to_string(),
                        source_path: PathBuf::from("/data/pdfs/pests.pdf"),
                        page_number: 1,
                    },
                    Chunk {
                        text: "Rotate maize with legumes to restore nitrogen".to_string(),
                        source_path: PathBuf::from("/data/pdfs/soil.pdf"),
                        page_number: 4,
                    },
                ],
            )
            .unwrap();

        let metadata = IndexMetadata {
            embedding_deployment: "text-embedding-3-small".to_string(),
            dimension: 3,
            chunk_count: 2,
            created_at: Utc::now(),
        };
        (index, metadata)
    }

    #[test]
    fn test_round_trip_preserves_search_results() {
        let dir = tempfile::tempdir().unwrap();
        let (index, metadata) = sample_index();

        VectorIndexStore::save(&index, &metadata, dir.path()).unwrap();
        let (loaded, loaded_meta) = VectorIndexStore::load(dir.path()).unwrap();

        assert_eq!(loaded_meta, metadata);
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.chunks(), index.chunks());

        let query = vec![0.8, 0.2, 0.0];
        let before = index.search(&query, 2).unwrap();
        let after = loaded.search(&query, 2).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_load_missing_location_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = VectorIndexStore::load(&dir.path().join("absent"));
        assert!(matches!(result, Err(AdvisorError::IndexNotFound(_))));
    }

    #[test]
    fn test_load_partial_bundle_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORS_FILE), b"whatever").unwrap();

        let result = VectorIndexStore::load(dir.path());
        assert!(matches!(result, Err(AdvisorError::IndexNotFound(_))));
    }

    #[test]
    fn test_load_corrupt_vectors_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let (index, metadata) = sample_index();
        VectorIndexStore::save(&index, &metadata, dir.path()).unwrap();

        std::fs::write(dir.path().join(VECTORS_FILE), b"\xde\xad\xbe\xef").unwrap();

        let result = VectorIndexStore::load(dir.path());
        assert!(matches!(result, Err(AdvisorError::IndexCorrupt(_))));
    }

    #[test]
    fn test_load_count_mismatch_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let (index, mut metadata) = sample_index();
        metadata.chunk_count = 5;
        VectorIndexStore::save(&index, &metadata, dir.path()).unwrap();

        let result = VectorIndexStore::load(dir.path());
        assert!(matches!(result, Err(AdvisorError::IndexCorrupt(_))));
    }

    #[test]
    fn test_save_overwrites_previous_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let (index, metadata) = sample_index();
        VectorIndexStore::save(&index, &metadata, dir.path()).unwrap();

        let mut replacement = VectorIndex::new(3);
        replacement
            .append_batch(
                vec![vec![0.0, 0.0, 1.0]],
                vec![Chunk {
                    text: "Store grain in sealed bags to deter weevils".to_string(),
                    source_path: PathBuf::from("/data/pdfs/storage.pdf"),
                    page_number: 2,
                }],
            )
            .unwrap();
        let replacement_meta = IndexMetadata {
            chunk_count: 1,
            ..metadata
        };

        VectorIndexStore::save(&replacement, &replacement_meta, dir.path()).unwrap();
        let (loaded, loaded_meta) = VectorIndexStore::load(dir.path()).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded_meta.chunk_count, 1);
        assert!(loaded.chunks()[0].text.contains("sealed bags"));
    }
}
