//! Approval scoring.

use crate::models::applicant::{ApprovalAssessment, ApprovalTier, Occupation, ScoreComponent};

/// Signals the approval score is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalSignals {
    pub contribution_threshold_met: bool,
    pub tax_id_valid: bool,
    pub documents_complete: bool,
    /// `None` when the submission declared no occupation.
    pub occupation: Option<Occupation>,
}

/// Score the signals and map the total to a tier.
pub fn score_approval(signals: &ApprovalSignals) -> ApprovalAssessment {
    let mut components = Vec::new();

    if signals.contribution_threshold_met {
        components.push(ScoreComponent {
            factor: "contributions".to_string(),
            points: 2.0,
            notes: "minimum contribution history met".to_string(),
        });
    }

    if signals.tax_id_valid {
        components.push(ScoreComponent {
            factor: "tax_id".to_string(),
            points: 1.0,
            notes: "tax ID check digits valid".to_string(),
        });
    }

    if signals.documents_complete {
        components.push(ScoreComponent {
            factor: "documents".to_string(),
            points: 1.0,
            notes: "all required documents supplied".to_string(),
        });
    }

    if let Some(occupation) = signals.occupation {
        let points = match occupation {
            Occupation::Employed => 1.0,
            Occupation::SelfEmployedFormal
            | Occupation::SelfEmployedInformal
            | Occupation::Unemployed => 0.5,
        };
        components.push(ScoreComponent {
            factor: "occupation".to_string(),
            points,
            notes: format!("occupation {}", occupation),
        });
    }

    let score: f32 = components.iter().map(|c| c.points).sum();

    ApprovalAssessment {
        tier: tier_for_score(score),
        score,
        components,
    }
}

/// Thresholds are half-open on the low side: 2.0 is already
/// `SlightlyUnlikely`.
pub fn tier_for_score(score: f32) -> ApprovalTier {
    if score < 2.0 {
        ApprovalTier::Unlikely
    } else if score < 3.0 {
        ApprovalTier::SlightlyUnlikely
    } else if score < 4.0 {
        ApprovalTier::Likely
    } else {
        ApprovalTier::VeryLikely
    }
}
