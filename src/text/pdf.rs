//! PDF corpus loading
//!
//! Loads a directory of PDF documents into page-level records. A corpus
//! directory that is missing or holds no PDFs yields an empty result rather
//! than an error, and a single unreadable document is logged and skipped so
//! the rest of the batch still loads.

use crate::error::{AdvisorError, Result};
use crate::text::chunking::PageRecord;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    // Extracted PDF text tends to carry stray carriage returns, runs of
    // horizontal whitespace, and towers of blank lines. Collapse them while
    // keeping the paragraph breaks the splitter cuts on.
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t]{2,}").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Loader for a directory of PDF documents
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load every `*.pdf` file directly inside `directory` into page records.
    ///
    /// Files are processed in sorted name order so repeated runs over the
    /// same corpus produce identical record ordering. Returns an empty vector
    /// when the directory is missing or contains no PDFs.
    pub fn load_pdfs<P: AsRef<Path>>(directory: P) -> Result<Vec<PageRecord>> {
        let directory = directory.as_ref();

        if !directory.exists() {
            log::warn!("PDF directory {} does not exist", directory.display());
            return Ok(Vec::new());
        }

        let mut pdf_files: Vec<PathBuf> = std::fs::read_dir(directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_pdf(path))
            .collect();
        pdf_files.sort();

        if pdf_files.is_empty() {
            log::warn!("No PDF files found in {}", directory.display());
            return Ok(Vec::new());
        }

        log::info!(
            "Found {} PDF file(s) in {}",
            pdf_files.len(),
            directory.display()
        );

        let mut records = Vec::new();
        for path in &pdf_files {
            match Self::load_pdf(path) {
                Ok(mut pages) => {
                    log::info!("Loaded {} page(s) from {}", pages.len(), path.display());
                    records.append(&mut pages);
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        log::info!("Total pages loaded: {}", records.len());
        Ok(records)
    }

    /// Load a single PDF into one record per physical page, in page order.
    pub fn load_pdf(path: &Path) -> Result<Vec<PageRecord>> {
        let source_path = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|e| AdvisorError::Pdf(format!("{}: {}", path.display(), e)))?;

        let records = pages
            .into_iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let text = normalize_page_text(&text);
                if text.trim().is_empty() {
                    // Blank or image-only pages have nothing to embed; page
                    // numbering still reflects physical page order.
                    return None;
                }
                Some(PageRecord {
                    text,
                    source_path: source_path.clone(),
                    page_number: (i + 1) as u32,
                })
            })
            .collect();

        Ok(records)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn normalize_page_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    BLANK_LINES.replace_all(&text, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_directory_yields_empty() {
        let records = DocumentLoader::load_pdfs("/nonexistent/pdf/corpus").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_directory_without_pdfs_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();

        let records = DocumentLoader::load_pdfs(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_pdf_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("broken.pdf")).unwrap();
        file.write_all(b"this is not a real pdf payload").unwrap();

        // The batch completes; the unreadable file contributes nothing.
        let records = DocumentLoader::load_pdfs(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_single_corrupt_pdf_errors_when_loaded_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"garbage").unwrap();

        assert!(matches!(
            DocumentLoader::load_pdf(&path),
            Err(AdvisorError::Pdf(_))
        ));
    }

    #[test]
    fn test_pdf_extension_detection() {
        assert!(is_pdf(Path::new("report.pdf")));
        assert!(is_pdf(Path::new("REPORT.PDF")));
        assert!(!is_pdf(Path::new("report.txt")));
        assert!(!is_pdf(Path::new("report")));
    }

    #[test]
    fn test_page_text_normalization() {
        let raw = "Maize  spacing\r\n\r\n\r\n\r\nPlant   rows\tapart";
        let normalized = normalize_page_text(raw);
        assert_eq!(normalized, "Maize spacing\n\nPlant rows\tapart");
    }
}
