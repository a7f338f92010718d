//! Splitting page records into overlapping chunks
//!
//! Chunks are the unit of embedding and retrieval. Splitting prefers the
//! largest separator that yields pieces within the size limit (paragraph
//! breaks, then line breaks, then spaces) and falls back to hard character
//! cuts. Consecutive chunks from one page share a fixed overlap so context
//! survives cut points.

use crate::config::ChunkingConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Text of one physical PDF page with its provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageRecord {
    /// Extracted page text
    pub text: String,

    /// Absolute path of the source PDF
    pub source_path: PathBuf,

    /// 1-based page number within the source PDF
    pub page_number: u32,
}

/// A bounded-length slice of page text, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk text, a contiguous substring of its source page text
    pub text: String,

    /// Absolute path of the source PDF, inherited from the page record
    pub source_path: PathBuf,

    /// 1-based page number, inherited from the page record
    pub page_number: u32,
}

impl Chunk {
    /// Base name of the source file, used when labelling context entries.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Separators tried largest-first before falling back to hard cuts
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splitter for turning page records into overlapping chunks
pub struct DocumentSplitter {
    config: ChunkingConfig,
}

impl DocumentSplitter {
    /// Create a splitter, rejecting degenerate configurations up front.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a splitter with default configuration
    pub fn with_default_config() -> Result<Self> {
        Self::new(ChunkingConfig::default())
    }

    /// Split page records into chunks. Each chunk inherits the metadata of
    /// exactly one page record; chunks never span pages.
    pub fn split(&self, records: &[PageRecord]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for record in records {
            for piece in self.split_text(&record.text) {
                if piece.trim().is_empty() {
                    continue;
                }
                chunks.push(Chunk {
                    text: piece,
                    source_path: record.source_path.clone(),
                    page_number: record.page_number,
                });
            }
        }

        log::info!(
            "Split {} page(s) into {} chunk(s)",
            records.len(),
            chunks.len()
        );
        chunks
    }

    /// Split a single text into overlapping pieces of at most `chunk_size`
    /// characters. Sizes and offsets are counted in characters, not bytes.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        if chars.len() <= size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        let mut start = 0usize;

        loop {
            let hard_end = usize::min(start + size, chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                self.boundary(&chars, start, hard_end)
            };

            pieces.push(chars[start..end].iter().collect::<String>());

            if end == chars.len() {
                break;
            }

            let mut next = end.saturating_sub(overlap);
            if next <= start {
                // Guarantees forward progress even for pathological windows.
                next = start + 1;
            }
            start = next;
        }

        pieces
    }

    /// Pick the cut point for a full window: the end of the last occurrence
    /// of the largest separator that still leaves room to advance past the
    /// overlap, or the hard window end when no separator qualifies.
    fn boundary(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let overlap = self.config.chunk_overlap;

        for sep in SEPARATORS {
            let sep_chars: Vec<char> = sep.chars().collect();
            if let Some(cut) = last_separator_end(chars, start, hard_end, &sep_chars) {
                if cut > start + overlap {
                    return cut;
                }
            }
        }

        hard_end
    }
}

/// Position just past the last occurrence of `sep` fully inside
/// `chars[start..end]`, or None when the window does not contain it.
fn last_separator_end(chars: &[char], start: usize, end: usize, sep: &[char]) -> Option<usize> {
    if sep.is_empty() || end.saturating_sub(start) < sep.len() {
        return None;
    }

    let mut pos = end - sep.len();
    loop {
        if chars[pos..pos + sep.len()] == sep[..] {
            return Some(pos + sep.len());
        }
        if pos == start {
            return None;
        }
        pos -= 1;
    }
}
