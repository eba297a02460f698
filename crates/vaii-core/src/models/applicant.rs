//! Applicant record assembled from one submission.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{DocumentType, ProcessedDocument};
use crate::error::VaiiError;

/// Declared occupation of the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Occupation {
    /// Formally employed (CLT).
    Employed,
    /// Registered individual micro-entrepreneur (MEI).
    SelfEmployedFormal,
    /// Informal self-employment (autônoma).
    SelfEmployedInformal,
    /// Unemployed (desempregada).
    Unemployed,
}

impl Occupation {
    /// Parse an occupation from its English key or the form value used on
    /// the intake sheet.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "employed" | "clt" => Some(Occupation::Employed),
            "self-employed-formal" | "mei" => Some(Occupation::SelfEmployedFormal),
            "self-employed-informal" | "autonoma" | "autônoma" => {
                Some(Occupation::SelfEmployedInformal)
            }
            "unemployed" | "desempregada" => Some(Occupation::Unemployed),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Occupation::Employed => "employed",
            Occupation::SelfEmployedFormal => "self-employed-formal",
            Occupation::SelfEmployedInformal => "self-employed-informal",
            Occupation::Unemployed => "unemployed",
        }
    }
}

impl FromStr for Occupation {
    type Err = VaiiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Occupation::parse(s).ok_or_else(|| VaiiError::Config(format!("unknown occupation: {s}")))
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether every extracted name agrees, ignoring case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameConsistency {
    #[default]
    Consistent,
    Inconsistent,
}

/// Eligibility outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// At least the required number of distinct contribution months.
    pub contribution_threshold_met: bool,
    /// Continued insured status (configured, not computed).
    pub insured_status: bool,
    /// Filing within the deadline (configured, not computed).
    pub within_deadline: bool,
    pub message: String,
}

/// Final categorical recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalTier {
    Unlikely,
    SlightlyUnlikely,
    Likely,
    VeryLikely,
}

impl ApprovalTier {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalTier::Unlikely => "Benefit unlikely",
            ApprovalTier::SlightlyUnlikely => "Slightly unlikely",
            ApprovalTier::Likely => "Likely",
            ApprovalTier::VeryLikely => "Very likely",
        }
    }
}

/// A factor that contributed to the approval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: String,
    pub points: f32,
    pub notes: String,
}

/// Scored approval assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalAssessment {
    pub tier: ApprovalTier,
    pub score: f32,
    pub components: Vec<ScoreComponent>,
}

/// The aggregate built across all documents in one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Present exactly when `tax_id` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id_valid: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_insurance_number: Option<String>,

    /// Month (`YYYY-MM`) to amount, merged across contribution statements.
    pub contributions: BTreeMap<String, Decimal>,

    pub self_employment_proof: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<Occupation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_benefit: Option<Decimal>,

    pub name_consistency: NameConsistency,

    pub missing_required_documents: BTreeSet<DocumentType>,

    pub eligibility: Eligibility,

    pub approval_tier: ApprovalTier,

    /// Score and the factors behind `approval_tier`.
    pub approval: ApprovalAssessment,
}

impl ApplicantRecord {
    pub fn approval_tier(&self) -> ApprovalTier {
        self.approval_tier
    }

    /// Contributions for the most recent `months` months, newest first.
    pub fn recent_contributions(&self, months: usize) -> Vec<(&str, Decimal)> {
        self.contributions
            .iter()
            .rev()
            .take(months)
            .map(|(month, amount)| (month.as_str(), *amount))
            .collect()
    }
}

/// Full report for one submission: the applicant record plus the
/// per-document summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    #[serde(flatten)]
    pub applicant: ApplicantRecord,

    pub documents_processed: Vec<ProcessedDocument>,
}
