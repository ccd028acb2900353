//! sift-ingest: statement text extraction and bank-agnostic transaction parsing.

pub mod classify;
pub mod extract;
pub mod patterns;
pub mod pipeline;
pub mod resolve;
pub mod segment;
pub mod summary;

pub use classify::{LineKind, classify};
pub use extract::{
    ExtractedDocument, PdfTextExtractor, PlainTextExtractor, TextExtractor, extractor_for,
};
pub use pipeline::parse_statement;
pub use resolve::{Resolved, resolve};
pub use segment::{RawLine, parse_line, segment};
pub use summary::extract_summary;
