//! Folding per-document fields into one applicant aggregate.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::extraction::rules::validate_tax_id;
use crate::models::applicant::NameConsistency;
use crate::models::document::{DocumentType, ExtractedFields};

/// Running state built across a submission's documents.
///
/// Each fold consumes the aggregate and returns the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Most recent name candidate.
    pub name: Option<String>,
    /// Tax ID from the first name-bearing document that had one.
    pub tax_id: Option<String>,
    /// Checksum result, set together with `tax_id`.
    pub tax_id_valid: Option<bool>,
    pub social_insurance_number: Option<String>,
    pub contributions: BTreeMap<String, Decimal>,
    pub self_employment_proof: bool,
    /// Every non-empty name candidate, in processing order.
    pub observed_names: Vec<String>,
    /// Declared types of every supplied document, whatever its verdict.
    pub supplied: BTreeSet<DocumentType>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a document of `doc_type` was supplied.
    pub fn record_supplied(mut self, doc_type: DocumentType) -> Self {
        self.supplied.insert(doc_type);
        self
    }

    /// Fold one document's extracted fields into the aggregate.
    pub fn fold(mut self, doc_type: DocumentType, fields: &ExtractedFields) -> Self {
        self.supplied.insert(doc_type);

        if doc_type.is_name_bearing() {
            if let Some(name) = fields.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                self.observed_names.push(name.to_string());
                self.name = Some(name.to_string());
            }

            if self.tax_id.is_none() {
                if let Some(tax_id) = fields.tax_id.as_ref() {
                    self.tax_id_valid = Some(validate_tax_id(tax_id));
                    self.tax_id = Some(tax_id.clone());
                }
            }
        }

        if let Some(contributions) = &fields.contributions {
            for (month, amount) in contributions {
                self.contributions.insert(month.clone(), *amount);
            }
        }

        if let Some(number) = &fields.social_insurance_number {
            self.social_insurance_number = Some(number.clone());
        }

        if fields.self_employment_proof {
            self.self_employment_proof = true;
        }

        debug!(
            "Folded {}: {} names observed, {} contribution months",
            doc_type,
            self.observed_names.len(),
            self.contributions.len()
        );

        self
    }

    /// Compare every observed name case-insensitively.
    pub fn name_consistency(&self) -> NameConsistency {
        let distinct: BTreeSet<String> =
            self.observed_names.iter().map(|n| n.to_lowercase()).collect();

        if distinct.len() > 1 {
            NameConsistency::Inconsistent
        } else {
            NameConsistency::Consistent
        }
    }
}
