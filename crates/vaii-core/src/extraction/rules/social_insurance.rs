//! Social-insurance number (PIS/PASEP) extraction.

use super::patterns::SOCIAL_INSURANCE_LABELED;

/// Extract the labeled social-insurance number (XXX.XXXXX.XX-X).
pub fn extract_social_insurance_number(text: &str) -> Option<String> {
    SOCIAL_INSURANCE_LABELED
        .captures(text)
        .map(|caps| caps[1].to_string())
}
