//! Field extraction for submitted documents.
//!
//! Each document type runs only the extractors that apply to it. A missing
//! match leaves the field absent; nothing here fails.

pub mod rules;

use tracing::debug;

use crate::models::document::{DocumentType, ExtractedFields};

use rules::{
    extract_contributions, extract_name, extract_social_insurance_number, extract_tax_id,
    validate_tax_id,
};

/// Run the extractors relevant to `doc_type` over the document text.
pub fn extract_fields(doc_type: DocumentType, text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    match doc_type {
        DocumentType::Identity | DocumentType::BirthCertificate => {
            fields.name = extract_name(text);
            fields.tax_id = extract_tax_id(text);
            fields.tax_id_valid = fields.tax_id.as_deref().map(validate_tax_id);
        }
        DocumentType::ContributionStatement => {
            fields.contributions = Some(extract_contributions(text));
        }
        DocumentType::SocialInsuranceCard => {
            fields.social_insurance_number = extract_social_insurance_number(text);
        }
        DocumentType::SelfEmploymentProof => {
            fields.self_employment_proof = true;
        }
    }

    debug!(
        "Extracted from {}: name={}, tax_id={}, social_insurance={}, contributions={}",
        doc_type,
        fields.name.is_some(),
        fields.tax_id.is_some(),
        fields.social_insurance_number.is_some(),
        fields.contributions.as_ref().map_or(0, |c| c.len()),
    );

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: &str = "\
        REPÚBLICA FEDERATIVA DO BRASIL\n\
        CARTEIRA DE IDENTIDADE\n\
        NOME: MARIA DA SILVA\n\
        CPF: 529.982.247-25\n\
        PIS/PASEP: 120.54321.98-7\n\
        2023-05: 1.000,00\n";

    #[test]
    fn test_identity_extracts_name_and_tax_id_only() {
        let fields = extract_fields(DocumentType::Identity, IDENTITY);
        assert_eq!(fields.name.as_deref(), Some("Maria Da Silva"));
        assert_eq!(fields.tax_id.as_deref(), Some("529.982.247-25"));
        assert_eq!(fields.tax_id_valid, Some(true));
        assert_eq!(fields.social_insurance_number, None);
        assert_eq!(fields.contributions, None);
    }

    #[test]
    fn test_contribution_statement() {
        let fields = extract_fields(DocumentType::ContributionStatement, IDENTITY);
        assert_eq!(fields.contributions.map(|c| c.len()), Some(1));
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_contribution_statement_without_lines_yields_empty_map() {
        let fields = extract_fields(DocumentType::ContributionStatement, "nothing");
        assert_eq!(fields.contributions.map(|c| c.is_empty()), Some(true));
    }

    #[test]
    fn test_social_insurance_card() {
        let fields = extract_fields(DocumentType::SocialInsuranceCard, IDENTITY);
        assert_eq!(fields.social_insurance_number.as_deref(), Some("120.54321.98-7"));
    }

    #[test]
    fn test_self_employment_proof_presence() {
        let fields = extract_fields(DocumentType::SelfEmploymentProof, "");
        assert!(fields.self_employment_proof);
    }

    #[test]
    fn test_tax_id_validity_absent_without_tax_id() {
        let fields = extract_fields(DocumentType::BirthCertificate, "Nome: Ana Souza");
        assert_eq!(fields.tax_id, None);
        assert_eq!(fields.tax_id_valid, None);
    }
}
