//! Error types for the vaii-core library.
//!
//! Per-document problems never surface here: the pipeline degrades them into
//! verdicts and absent fields. `PdfError` and `StorageError` stay inside their
//! collaborator seams; `VaiiError` covers configuration loading and parsing.

use thiserror::Error;

/// Main error type for the vaii library.
#[derive(Error, Debug)]
pub enum VaiiError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Extraction did not finish within the configured bound.
    #[error("text extraction timed out after {0} ms")]
    Timeout(u64),
}

/// Errors raised while storing a document under its standardised name.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A different file already occupies the target name.
    #[error("target file already exists: {0}")]
    Collision(String),

    /// Identifying fields could not produce a usable file name.
    #[error("cannot build a file name from tax ID {tax_id:?} and name {name:?}")]
    InvalidName { tax_id: String, name: String },

    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the vaii library.
pub type Result<T> = std::result::Result<T, VaiiError>;
