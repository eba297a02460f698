//! Core library for maternity-benefit application pre-screening.
//!
//! This crate provides:
//! - A quality gate for submitted documents (size, format, extractable text)
//! - Page-capped PDF text extraction with a bounded run time
//! - Rule-based field extraction (CPF tax ID, name, PIS/PASEP number, monthly
//!   contributions) and CPF check-digit validation
//! - Aggregation of per-document fields into one applicant record
//! - Benefit estimation, eligibility and completeness checks, and an approval
//!   recommendation
//!
//! The results are advisory and meant for manual review before a claim is
//! filed.

pub mod assessment;
pub mod documents;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use assessment::{assess, Aggregate};
pub use documents::{DocumentStore, FsDocumentStore, QualityGate};
pub use error::{PdfError, Result, StorageError, VaiiError};
pub use extraction::extract_fields;
pub use models::applicant::{
    ApplicantRecord, ApprovalAssessment, ApprovalTier, AssessmentReport, Eligibility,
    NameConsistency, Occupation, ScoreComponent,
};
pub use models::config::VaiiConfig;
pub use models::document::{
    DocumentType, ExtractedFields, ProcessedDocument, QualityVerdict, Submission,
    SubmittedDocument,
};
pub use pdf::{PdfTextExtractor, TextExtractor};
pub use pipeline::Pipeline;
