//! Quality gate: size, format and extractable-text checks for one document.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::models::config::QualityConfig;
use crate::models::document::{QualityVerdict, SubmittedDocument};
use crate::pdf::{extract_with_timeout, TextExtractor};

/// Label for text that passes the minimum-length check.
pub const TEXT_QUALITY_OK: &str = "OK";

/// Label for text that does not.
pub const TEXT_QUALITY_LOW: &str = "Low quality: insufficient text for analysis.";

/// Outcome of inspecting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub verdict: QualityVerdict,
    /// Extracted text; empty when extraction was skipped or failed.
    pub text: String,
    pub text_quality: &'static str,
}

/// Advisory quality checks. The gate never fails; callers decide what to do
/// with a non-valid verdict.
pub struct QualityGate {
    config: QualityConfig,
    extractor: Arc<dyn TextExtractor>,
}

impl QualityGate {
    pub fn new(config: QualityConfig, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Check size, then format, then extractable text length.
    pub fn inspect(&self, document: &SubmittedDocument) -> Inspection {
        let verdict_without_text = if document.size() > self.config.max_file_size {
            Some(QualityVerdict::TooLarge)
        } else if !self.is_supported(document) {
            Some(QualityVerdict::UnsupportedFormat)
        } else {
            None
        };

        if let Some(verdict) = verdict_without_text {
            warn!(
                "Rejected {}: {}",
                document.original_name,
                verdict.describe(self.config.max_file_size)
            );
            return Inspection {
                verdict,
                text: String::new(),
                text_quality: self.text_quality(""),
            };
        }

        let text = self.extract_text(document);
        let text_quality = self.text_quality(&text);
        let verdict = if text_quality == TEXT_QUALITY_OK {
            QualityVerdict::Valid
        } else {
            warn!(
                "Rejected {}: {}",
                document.original_name,
                QualityVerdict::LowQuality.describe(self.config.max_file_size)
            );
            QualityVerdict::LowQuality
        };

        Inspection {
            verdict,
            text,
            text_quality,
        }
    }

    /// Best-effort text extraction bounded by the configured timeout.
    /// Any failure yields empty text.
    pub fn extract_text(&self, document: &SubmittedDocument) -> String {
        let timeout = Duration::from_millis(self.config.extraction_timeout_ms);

        match extract_with_timeout(
            Arc::clone(&self.extractor),
            document.data.clone(),
            self.config.max_pages,
            timeout,
        ) {
            Ok(text) => {
                debug!("Extracted {} characters from {}", text.len(), document.original_name);
                text
            }
            Err(e) => {
                warn!("Text extraction failed for {}: {}", document.original_name, e);
                String::new()
            }
        }
    }

    /// `OK` when the trimmed text reaches the minimum length.
    pub fn text_quality(&self, text: &str) -> &'static str {
        if text.trim().chars().count() < self.config.min_text_length {
            TEXT_QUALITY_LOW
        } else {
            TEXT_QUALITY_OK
        }
    }

    fn is_supported(&self, document: &SubmittedDocument) -> bool {
        document
            .extension()
            .is_some_and(|ext| self.config.supported_extensions.iter().any(|s| *s == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::pdf;

    /// Returns the document bytes as UTF-8 text.
    struct Utf8Extractor;

    impl TextExtractor for Utf8Extractor {
        fn extract_text(&self, data: &[u8], _max_pages: usize) -> pdf::Result<String> {
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract_text(&self, _data: &[u8], _max_pages: usize) -> pdf::Result<String> {
            Err(PdfError::Parse("corrupt xref table".to_string()))
        }
    }

    fn gate() -> QualityGate {
        QualityGate::new(QualityConfig::default(), Arc::new(Utf8Extractor))
    }

    fn long_text() -> Vec<u8> {
        "Nome: Maria da Silva, CPF 529.982.247-25, emitido pela SSP/SP em 2019."
            .as_bytes()
            .to_vec()
    }

    #[test]
    fn test_valid_document() {
        let inspection = gate().inspect(&SubmittedDocument::new("rg.pdf", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::Valid);
        assert_eq!(inspection.text_quality, TEXT_QUALITY_OK);
        assert!(inspection.text.contains("Maria"));
    }

    #[test]
    fn test_too_large_checked_first() {
        let config = QualityConfig {
            max_file_size: 10,
            ..QualityConfig::default()
        };
        let gate = QualityGate::new(config, Arc::new(Utf8Extractor));

        let inspection = gate.inspect(&SubmittedDocument::new("rg.docx", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::TooLarge);
        assert!(inspection.text.is_empty());
    }

    #[test]
    fn test_unsupported_format() {
        let inspection = gate().inspect(&SubmittedDocument::new("rg.jpg", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::UnsupportedFormat);

        let inspection = gate().inspect(&SubmittedDocument::new("rg", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::UnsupportedFormat);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let inspection = gate().inspect(&SubmittedDocument::new("RG.PDF", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::Valid);
    }

    #[test]
    fn test_short_text_is_low_quality() {
        let data = format!("   {}   \n\n", "x".repeat(49)).into_bytes();
        let inspection = gate().inspect(&SubmittedDocument::new("rg.pdf", data));
        assert_eq!(inspection.verdict, QualityVerdict::LowQuality);
        assert_eq!(inspection.text_quality, TEXT_QUALITY_LOW);
    }

    #[test]
    fn test_exactly_minimum_length_is_valid() {
        let data = "x".repeat(50).into_bytes();
        let inspection = gate().inspect(&SubmittedDocument::new("rg.pdf", data));
        assert_eq!(inspection.verdict, QualityVerdict::Valid);
    }

    #[test]
    fn test_extraction_failure_is_low_quality() {
        let gate = QualityGate::new(QualityConfig::default(), Arc::new(FailingExtractor));
        let inspection = gate.inspect(&SubmittedDocument::new("rg.pdf", long_text()));
        assert_eq!(inspection.verdict, QualityVerdict::LowQuality);
        assert!(inspection.text.is_empty());
    }
}
