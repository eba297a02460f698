//! Rule-based field extractors for identity and social-security documents.

pub mod contributions;
pub mod name;
pub mod patterns;
pub mod social_insurance;
pub mod tax_id;

pub use contributions::{
    extract_contributions, format_amount, parse_amount, ContributionExtractor,
};
pub use name::{extract_name, title_case, NameExtractor};
pub use social_insurance::extract_social_insurance_number;
pub use tax_id::{extract_tax_id, format_tax_id, validate_tax_id, TaxIdExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
