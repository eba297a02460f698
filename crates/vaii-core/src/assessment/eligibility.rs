//! Contribution eligibility and document completeness checks.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::models::applicant::{Eligibility, Occupation};
use crate::models::config::EligibilityConfig;
use crate::models::document::DocumentType;

/// Documents every submission must include.
pub const BASE_REQUIRED_DOCUMENTS: [DocumentType; 4] = [
    DocumentType::Identity,
    DocumentType::BirthCertificate,
    DocumentType::ContributionStatement,
    DocumentType::SocialInsuranceCard,
];

/// Evaluate whether the contribution history is long enough to proceed.
pub fn check_eligibility(
    contributions: &BTreeMap<String, Decimal>,
    config: &EligibilityConfig,
) -> Eligibility {
    let required = config.required_contribution_months;
    let contribution_threshold_met = contributions.len() >= required;

    let message = if contribution_threshold_met {
        "Applicant is eligible to proceed.".to_string()
    } else {
        format!(
            "Applicant is not eligible to proceed: {} months of contributions are required.",
            required
        )
    };

    Eligibility {
        contribution_threshold_met,
        insured_status: config.assume_insured_status,
        within_deadline: config.assume_within_deadline,
        message,
    }
}

/// Documents required for `occupation`.
pub fn required_documents(occupation: Option<Occupation>) -> BTreeSet<DocumentType> {
    let mut required: BTreeSet<DocumentType> = BASE_REQUIRED_DOCUMENTS.into_iter().collect();
    if occupation == Some(Occupation::SelfEmployedFormal) {
        required.insert(DocumentType::SelfEmploymentProof);
    }
    required
}

/// Required documents whose type was not supplied.
pub fn missing_documents(
    occupation: Option<Occupation>,
    supplied: &BTreeSet<DocumentType>,
) -> BTreeSet<DocumentType> {
    required_documents(occupation)
        .difference(supplied)
        .copied()
        .collect()
}
