//! Submitted documents and their per-document extraction results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::applicant::Occupation;

/// Declared type of a submitted document.
///
/// Variant order is the order in which a submission is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// Mother's identity card.
    Identity,
    /// Child's birth certificate.
    BirthCertificate,
    /// Social-security contribution statement.
    ContributionStatement,
    /// Social-insurance registration card.
    SocialInsuranceCard,
    /// Proof of formal self-employment registration.
    SelfEmploymentProof,
}

impl DocumentType {
    /// Every document type, in processing order.
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Identity,
        DocumentType::BirthCertificate,
        DocumentType::ContributionStatement,
        DocumentType::SocialInsuranceCard,
        DocumentType::SelfEmploymentProof,
    ];

    /// Documents that carry the applicant's name and tax ID.
    pub fn is_name_bearing(&self) -> bool {
        matches!(self, DocumentType::Identity | DocumentType::BirthCertificate)
    }

    /// Stable key used in file names and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Identity => "identity",
            DocumentType::BirthCertificate => "birth-certificate",
            DocumentType::ContributionStatement => "contribution-statement",
            DocumentType::SocialInsuranceCard => "social-insurance-card",
            DocumentType::SelfEmploymentProof => "self-employment-proof",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Identity => "Identity card",
            DocumentType::BirthCertificate => "Birth certificate",
            DocumentType::ContributionStatement => "Contribution statement",
            DocumentType::SocialInsuranceCard => "Social-insurance card",
            DocumentType::SelfEmploymentProof => "Self-employment proof",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Quality gate classification of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityVerdict {
    /// All checks passed.
    Valid,
    /// Larger than the configured maximum size.
    TooLarge,
    /// Not the supported page-text format.
    UnsupportedFormat,
    /// Too little extractable text.
    LowQuality,
}

impl QualityVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, QualityVerdict::Valid)
    }

    /// Operator-facing description of the verdict.
    pub fn describe(&self, max_file_size: u64) -> String {
        match self {
            QualityVerdict::Valid => "Valid file.".to_string(),
            QualityVerdict::TooLarge => format!(
                "File too large. Maximum {} MB.",
                max_file_size / (1024 * 1024)
            ),
            QualityVerdict::UnsupportedFormat => {
                "Unsupported format. Submit PDF documents only.".to_string()
            }
            QualityVerdict::LowQuality => {
                "Low file quality. Not enough text for analysis.".to_string()
            }
        }
    }
}

/// One document as handed over by the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedDocument {
    /// File name as supplied.
    pub original_name: String,
    /// Raw document bytes.
    pub data: Vec<u8>,
}

impl SubmittedDocument {
    pub fn new(original_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            original_name: original_name.into(),
            data,
        }
    }

    /// Read a document from disk, keeping its file name as the original name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let original_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self::new(original_name, data))
    }

    /// Lowercased extension of the original name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A whole submission: zero or one document per type plus the declared
/// occupation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub documents: BTreeMap<DocumentType, SubmittedDocument>,
    pub occupation: Option<Occupation>,
}

impl Submission {
    pub fn new(occupation: Option<Occupation>) -> Self {
        Self {
            documents: BTreeMap::new(),
            occupation,
        }
    }

    /// Attach a document, replacing any earlier one of the same type.
    pub fn with_document(mut self, doc_type: DocumentType, document: SubmittedDocument) -> Self {
        self.documents.insert(doc_type, document);
        self
    }
}

/// Sparse fields extracted from a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    /// Checksum result for this document's own tax ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id_valid: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_insurance_number: Option<String>,

    /// Month (`YYYY-MM`) to amount; present for contribution statements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<BTreeMap<String, Decimal>>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub self_employment_proof: bool,
}

/// Summary of one processed document, as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub doc_type: DocumentType,
    pub original_name: String,
    pub quality_verdict: QualityVerdict,

    /// `OK` or a note explaining why the text is insufficient.
    pub text_quality: String,

    #[serde(flatten)]
    pub fields: ExtractedFields,

    /// Name under which the document was stored, when storage succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
}
