//! Tax ID (CPF) extraction and check-digit validation.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{TAX_ID_BARE, TAX_ID_PUNCTUATED};

/// Tax ID field extractor.
///
/// Canonical punctuated matches always rank ahead of bare digit runs.
pub struct TaxIdExtractor;

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (full_match, confidence) in TAX_ID_PUNCTUATED
            .find_iter(text)
            .map(|m| (m, 0.95))
            .chain(TAX_ID_BARE.find_iter(text).map(|m| (m, 0.7)))
        {
            let tax_id = format_tax_id(full_match.as_str());

            if results.iter().any(|r: &ExtractionMatch<String>| r.value == tax_id) {
                continue;
            }

            results.push(
                ExtractionMatch::new(tax_id, confidence, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Extract a tax ID from text, in canonical punctuation.
pub fn extract_tax_id(text: &str) -> Option<String> {
    TaxIdExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a tax ID with the two check-digit algorithm.
///
/// Non-digits are ignored. The body must be exactly 11 digits and not a
/// single repeated digit.
pub fn validate_tax_id(tax_id: &str) -> bool {
    let digits: Vec<u32> = tax_id.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..9]);
    let mut body = digits[..9].to_vec();
    body.push(first);
    let second = check_digit(&body);

    digits[9] == first && digits[10] == second
}

/// Weighted modulo-11 check digit; weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Format a tax ID with canonical punctuation (XXX.XXX.XXX-XX).
pub fn format_tax_id(tax_id: &str) -> String {
    let digits: String = tax_id.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 11 {
        return tax_id.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
