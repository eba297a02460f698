//! Monthly contribution extraction from contribution statements.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::CONTRIBUTION_LINE;

/// Contribution line extractor producing `(month, amount)` pairs.
pub struct ContributionExtractor;

impl ContributionExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContributionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ContributionExtractor {
    type Output = ExtractionMatch<(String, Decimal)>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in CONTRIBUTION_LINE.captures_iter(text) {
            let month = &caps[1];
            let raw_amount = &caps[2];

            let Some(amount) = parse_amount(raw_amount) else {
                warn!("Skipping contribution {}: unparseable amount {:?}", month, raw_amount);
                continue;
            };

            let full = &caps[0];
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
            results.push(
                ExtractionMatch::new((month.to_string(), amount), 0.9, full)
                    .with_position(start, start + full.len()),
            );
        }

        results
    }
}

/// Extract every contribution in the text. Later lines for the same month
/// overwrite earlier ones.
pub fn extract_contributions(text: &str) -> BTreeMap<String, Decimal> {
    ContributionExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// Parse a thousands-dot / decimal-comma amount ("1.234,56") rounded to
/// two decimal places.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok().map(|d| d.round_dp(2))
}

/// Format an amount with thousands dots and a decimal comma.
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
