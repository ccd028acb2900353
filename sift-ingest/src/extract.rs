//! Text extraction from statement files.
//!
//! PDF pages come back from `pdf-extract` separated by form feeds; pages are
//! re-joined with a blank line so a row never straddles two pages.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const PAGE_BREAK: char = '\u{c}';

/// Text of a whole document, pages already joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: usize,
}

impl ExtractedDocument {
    /// Build from raw text whose pages are separated by form feeds.
    pub fn from_paged_text(raw: &str) -> Self {
        let pages: Vec<&str> = raw
            .split(PAGE_BREAK)
            .map(str::trim_end)
            .filter(|p| !p.trim().is_empty())
            .collect();
        Self {
            text: pages.join("\n\n"),
            page_count: pages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Source of statement text.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument>;
}

/// PDF statements via `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let raw = pdf_extract::extract_text_from_mem(&bytes)
            .with_context(|| format!("extracting text from {}", path.display()))?;
        let doc = ExtractedDocument::from_paged_text(&raw);
        info!(pages = doc.page_count, chars = doc.text.len(), "extracted pdf text");
        Ok(doc)
    }
}

/// Text that was already extracted elsewhere (`.txt` dumps, stdin captures).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let doc = ExtractedDocument::from_paged_text(&raw);
        debug!(pages = doc.page_count, chars = doc.text.len(), "read text file");
        Ok(doc)
    }
}

/// Pick an extractor from the file extension (`.pdf`, anything else is text).
pub fn extractor_for(path: &Path) -> Box<dyn TextExtractor> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Box::new(PdfTextExtractor)
    } else {
        Box::new(PlainTextExtractor)
    }
}
