//! PDF text extraction.
//!
//! Text extraction is the one collaborator the core depends on. It sits
//! behind [`TextExtractor`] so that callers (and tests) can swap in their own
//! implementation.

mod extractor;

pub use extractor::{extract_with_timeout, PdfTextExtractor};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for text extraction implementations.
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from at most `max_pages` pages of a document.
    fn extract_text(&self, data: &[u8], max_pages: usize) -> Result<String>;
}
