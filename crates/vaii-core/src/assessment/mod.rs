//! Assessment of an aggregated submission: benefit estimate, eligibility,
//! document completeness and the approval recommendation.

pub mod aggregate;
pub mod approval;
pub mod benefit;
pub mod eligibility;

pub use aggregate::Aggregate;
pub use approval::{score_approval, tier_for_score, ApprovalSignals};
pub use benefit::estimate_benefit;
pub use eligibility::{
    check_eligibility, missing_documents, required_documents, BASE_REQUIRED_DOCUMENTS,
};

use tracing::info;

use crate::models::applicant::{ApplicantRecord, Occupation};
use crate::models::config::VaiiConfig;

/// Turn a finished aggregate into the applicant record.
pub fn assess(
    aggregate: &Aggregate,
    occupation: Option<Occupation>,
    config: &VaiiConfig,
) -> ApplicantRecord {
    let estimated_benefit = estimate_benefit(&aggregate.contributions, &config.benefit);
    let eligibility = check_eligibility(&aggregate.contributions, &config.eligibility);
    let missing_required_documents = missing_documents(occupation, &aggregate.supplied);

    let approval = score_approval(&ApprovalSignals {
        contribution_threshold_met: eligibility.contribution_threshold_met,
        tax_id_valid: aggregate.tax_id_valid.unwrap_or(false),
        documents_complete: missing_required_documents.is_empty(),
        occupation,
    });

    info!(
        "Assessment: {} contribution months, benefit {:?}, tier {:?} (score {})",
        aggregate.contributions.len(),
        estimated_benefit,
        approval.tier,
        approval.score
    );

    ApplicantRecord {
        name: aggregate.name.clone(),
        tax_id: aggregate.tax_id.clone(),
        tax_id_valid: aggregate.tax_id_valid,
        social_insurance_number: aggregate.social_insurance_number.clone(),
        contributions: aggregate.contributions.clone(),
        self_employment_proof: aggregate.self_employment_proof,
        occupation,
        estimated_benefit,
        name_consistency: aggregate.name_consistency(),
        missing_required_documents,
        eligibility,
        approval_tier: approval.tier,
        approval,
    }
}
