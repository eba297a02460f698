//! Common regex patterns for identity and social-security documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Tax ID (CPF), canonical punctuation: 123.456.789-09
    pub static ref TAX_ID_PUNCTUATED: Regex = Regex::new(
        r"(\d{3})\.(\d{3})\.(\d{3})-(\d{2})"
    ).unwrap();

    // Tax ID as a bare run of digits
    pub static ref TAX_ID_BARE: Regex = Regex::new(
        r"(\d{3})(\d{3})(\d{3})(\d{2})"
    ).unwrap();

    // Labeled name; the label may sit on the line above the value
    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?i)(?:Nome|Name):\s*([A-Za-zÀ-ÿ]+(?:[ \t]+[A-Za-zÀ-ÿ]+)*)"
    ).unwrap();

    // Social-insurance number (PIS/PASEP): 123.45678.90-1
    pub static ref SOCIAL_INSURANCE_LABELED: Regex = Regex::new(
        r"(?i)PIS\s*/\s*PASEP[:\s]*(\d{3}\.\d{5}\.\d{2}-\d)"
    ).unwrap();

    // Contribution line: 2023-05: 1.234,56
    pub static ref CONTRIBUTION_LINE: Regex = Regex::new(
        r"(\d{4}-\d{2}):\s*([\d.,]+)"
    ).unwrap();
}
