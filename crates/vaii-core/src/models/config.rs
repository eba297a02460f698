//! Configuration structures for the pre-screening pipeline.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaiiError};

/// Main configuration for the vaii pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaiiConfig {
    /// Document quality gate configuration.
    pub quality: QualityConfig,

    /// Benefit estimation configuration.
    pub benefit: BenefitConfig,

    /// Eligibility policy configuration.
    pub eligibility: EligibilityConfig,

    /// Document storage configuration.
    pub storage: StorageConfig,
}

/// Quality gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Maximum accepted document size in bytes.
    pub max_file_size: u64,

    /// Minimum trimmed text length for a document to be usable.
    pub min_text_length: usize,

    /// Maximum pages handed to text extraction.
    pub max_pages: usize,

    /// Upper bound on a single text extraction call, in milliseconds.
    pub extraction_timeout_ms: u64,

    /// Accepted file extensions, lowercase and without the dot.
    pub supported_extensions: Vec<String>,

    /// Leave documents that fail the gate out of the aggregate.
    pub drop_invalid_documents: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            min_text_length: 50,
            max_pages: 5,
            extraction_timeout_ms: 10_000,
            supported_extensions: vec!["pdf".to_string()],
            drop_invalid_documents: true,
        }
    }
}

/// Benefit estimation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitConfig {
    /// Floor applied to the estimated benefit.
    pub minimum_wage: Decimal,

    /// Number of most recent months averaged.
    pub window_months: usize,
}

impl Default for BenefitConfig {
    fn default() -> Self {
        Self {
            minimum_wage: Decimal::new(141_200, 2),
            window_months: 12,
        }
    }
}

/// Eligibility policy configuration.
///
/// `assume_insured_status` and `assume_within_deadline` stand in for checks
/// that are not computed from the documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Distinct contribution months required to proceed.
    pub required_contribution_months: usize,

    /// Value reported for continued insured status.
    pub assume_insured_status: bool,

    /// Value reported for the filing deadline check.
    pub assume_within_deadline: bool,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            required_contribution_months: 12,
            assume_insured_status: true,
            assume_within_deadline: true,
        }
    }
}

/// Document storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum characters of the applicant name kept in stored file names.
    pub name_max_len: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { name_max_len: 20 }
    }
}

impl VaiiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| VaiiError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| VaiiError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
