//! PDF text extraction using lopdf and pdf-extract.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextExtractor};
use crate::error::PdfError;

/// Page-capped PDF text extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the document, decrypt it when it only carries an empty user
    /// password, and drop every page past `max_pages`.
    fn prepare(&self, data: &[u8], max_pages: usize) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let mut modified = false;
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
            modified = true;
        }

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let excess: Vec<u32> = pages.iter().copied().skip(max_pages).collect();
        if !excess.is_empty() {
            trace!("Dropping {} pages past the limit of {}", excess.len(), max_pages);
            doc.delete_pages(&excess);
            modified = true;
        }

        if !modified {
            return Ok(data.to_vec());
        }

        let mut prepared = Vec::new();
        doc.save_to(&mut prepared)
            .map_err(|e| PdfError::Parse(format!("Failed to save trimmed PDF: {}", e)))?;
        Ok(prepared)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, data: &[u8], max_pages: usize) -> Result<String> {
        let prepared = self.prepare(data, max_pages)?;
        let text = pdf_extract::extract_text_from_mem(&prepared)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        debug!("Extracted {} characters of text", text.len());
        Ok(text)
    }
}

/// Run `extractor` on a worker thread and give up after `timeout`.
///
/// A worker that panics or outlives the timeout yields an error; the caller
/// decides how to degrade.
pub fn extract_with_timeout(
    extractor: Arc<dyn TextExtractor>,
    data: Vec<u8>,
    max_pages: usize,
    timeout: Duration,
) -> Result<String> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("vaii-text-extract".to_string())
        .spawn(move || {
            // The receiver is gone once the caller timed out.
            let _ = tx.send(extractor.extract_text(&data, max_pages));
        })
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(PdfError::Timeout(timeout.as_millis() as u64)),
        Err(RecvTimeoutError::Disconnected) => Err(PdfError::TextExtraction(
            "extraction worker exited without a result".to_string(),
        )),
    }
}
