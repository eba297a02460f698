//! End-to-end processing of one submission.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::assessment::{assess, Aggregate};
use crate::documents::{DocumentStore, QualityGate};
use crate::extraction::extract_fields;
use crate::models::applicant::AssessmentReport;
use crate::models::config::VaiiConfig;
use crate::models::document::{ExtractedFields, ProcessedDocument, Submission};
use crate::pdf::TextExtractor;

/// Runs every document of a submission through the quality gate and the
/// extractors, folds the results, and assesses the aggregate.
///
/// A run never fails: bad documents become verdicts, missing fields stay
/// absent, and storage problems are logged.
pub struct Pipeline {
    config: VaiiConfig,
    gate: QualityGate,
    store: Option<Box<dyn DocumentStore>>,
}

impl Pipeline {
    pub fn new(config: VaiiConfig, extractor: Arc<dyn TextExtractor>) -> Self {
        let gate = QualityGate::new(config.quality.clone(), extractor);
        Self {
            config,
            gate,
            store: None,
        }
    }

    /// Store accepted documents under their standard name once the
    /// applicant's tax ID and name are known.
    pub fn with_store(mut self, store: Box<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &VaiiConfig {
        &self.config
    }

    /// Process a submission. Documents are handled in [`DocumentType`] order.
    ///
    /// [`DocumentType`]: crate::models::document::DocumentType
    pub fn run(&self, submission: &Submission) -> AssessmentReport {
        let start = Instant::now();
        let mut aggregate = Aggregate::new();
        let mut processed = Vec::with_capacity(submission.documents.len());

        for (&doc_type, document) in &submission.documents {
            let inspection = self.gate.inspect(document);
            let include =
                inspection.verdict.is_valid() || !self.config.quality.drop_invalid_documents;

            let fields = if include {
                extract_fields(doc_type, &inspection.text)
            } else {
                debug!("Leaving {} out of the aggregate", document.original_name);
                ExtractedFields::default()
            };

            aggregate = if include {
                aggregate.fold(doc_type, &fields)
            } else {
                aggregate.record_supplied(doc_type)
            };

            processed.push(ProcessedDocument {
                doc_type,
                original_name: document.original_name.clone(),
                quality_verdict: inspection.verdict,
                text_quality: inspection.text_quality.to_string(),
                fields,
                stored_filename: None,
            });
        }

        self.store_documents(submission, &aggregate, &mut processed);

        let applicant = assess(&aggregate, submission.occupation, &self.config);

        info!(
            "Processed {} documents in {} ms",
            processed.len(),
            start.elapsed().as_millis()
        );

        AssessmentReport {
            applicant,
            documents_processed: processed,
        }
    }

    fn store_documents(
        &self,
        submission: &Submission,
        aggregate: &Aggregate,
        processed: &mut [ProcessedDocument],
    ) {
        let Some(store) = &self.store else {
            return;
        };

        let (Some(tax_id), Some(name)) = (aggregate.tax_id.as_deref(), aggregate.name.as_deref())
        else {
            debug!("Tax ID or name unknown, documents keep their original names");
            return;
        };

        for entry in processed.iter_mut().filter(|p| p.quality_verdict.is_valid()) {
            let Some(document) = submission.documents.get(&entry.doc_type) else {
                continue;
            };

            match store.store(document, tax_id, name, entry.doc_type) {
                Ok(file_name) => entry.stored_filename = Some(file_name),
                Err(e) => warn!("Could not store {}: {}", entry.original_name, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::FsDocumentStore;
    use crate::models::applicant::{ApprovalTier, NameConsistency, Occupation};
    use crate::models::document::{DocumentType, QualityVerdict, SubmittedDocument};
    use crate::pdf;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    /// Treats the document bytes as already-extracted text.
    struct Utf8Extractor;

    impl TextExtractor for Utf8Extractor {
        fn extract_text(&self, data: &[u8], _max_pages: usize) -> pdf::Result<String> {
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }

    const IDENTITY: &str = "CARTEIRA DE IDENTIDADE\n\
        Nome: MARIA DA SILVA\n\
        CPF: 529.982.247-25\n\
        Expedida em 12/03/2015 pela SSP/SP\n";

    const BIRTH_CERTIFICATE: &str = "CERTIDÃO DE NASCIMENTO\n\
        Nome: Maria da Silva\n\
        Documento da mãe CPF 529.982.247-25\n\
        Registrado no cartório do 1º ofício\n";

    const SOCIAL_INSURANCE_CARD: &str = "CARTÃO CIDADÃO\n\
        PIS/PASEP: 120.54321.98-7\n\
        Caixa Econômica Federal, emitido em 2016\n";

    const SELF_EMPLOYMENT_PROOF: &str = "CERTIFICADO DA CONDIÇÃO DE \
        MICROEMPREENDEDOR INDIVIDUAL, situação cadastral ativa desde 2020\n";

    fn statement() -> String {
        let mut text = String::from("EXTRATO PREVIDENCIÁRIO CNIS\nRemunerações:\n");
        for month in 1..=12 {
            text.push_str(&format!("2023-{month:02}: 2.500,00\n"));
        }
        text
    }

    fn doc(name: &str, text: &str) -> SubmittedDocument {
        SubmittedDocument::new(name, text.as_bytes().to_vec())
    }

    fn complete_submission(occupation: Option<Occupation>) -> Submission {
        Submission::new(occupation)
            .with_document(DocumentType::Identity, doc("rg.pdf", IDENTITY))
            .with_document(
                DocumentType::BirthCertificate,
                doc("certidao.pdf", BIRTH_CERTIFICATE),
            )
            .with_document(
                DocumentType::ContributionStatement,
                doc("cnis.pdf", &statement()),
            )
            .with_document(
                DocumentType::SocialInsuranceCard,
                doc("pis.pdf", SOCIAL_INSURANCE_CARD),
            )
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(VaiiConfig::default(), Arc::new(Utf8Extractor))
    }

    #[test]
    fn test_complete_submission() {
        let report = pipeline().run(&complete_submission(Some(Occupation::Employed)));
        let applicant = &report.applicant;

        assert_eq!(applicant.name.as_deref(), Some("Maria Da Silva"));
        assert_eq!(applicant.tax_id.as_deref(), Some("529.982.247-25"));
        assert_eq!(applicant.tax_id_valid, Some(true));
        assert_eq!(applicant.social_insurance_number.as_deref(), Some("120.54321.98-7"));
        assert_eq!(applicant.contributions.len(), 12);
        assert_eq!(applicant.estimated_benefit, Some(Decimal::new(250_000, 2)));
        assert_eq!(applicant.name_consistency, NameConsistency::Consistent);
        assert!(applicant.missing_required_documents.is_empty());
        assert_eq!(applicant.approval_tier(), ApprovalTier::VeryLikely);

        let types: Vec<DocumentType> =
            report.documents_processed.iter().map(|d| d.doc_type).collect();
        assert_eq!(types, DocumentType::ALL[..4].to_vec());
        assert!(report
            .documents_processed
            .iter()
            .all(|d| d.quality_verdict == QualityVerdict::Valid && d.stored_filename.is_none()));
    }

    #[test]
    fn test_inconsistent_names() {
        let submission = complete_submission(Some(Occupation::Employed)).with_document(
            DocumentType::BirthCertificate,
            doc(
                "certidao.pdf",
                "CERTIDÃO DE NASCIMENTO\nNome: Ana Paula Souza\nCartório do 1º ofício de notas\n",
            ),
        );

        let report = pipeline().run(&submission);
        assert_eq!(report.applicant.name_consistency, NameConsistency::Inconsistent);
        assert_eq!(report.applicant.name.as_deref(), Some("Ana Paula Souza"));
        assert_eq!(report.applicant.tax_id.as_deref(), Some("529.982.247-25"));
    }

    #[test]
    fn test_invalid_document_still_counts_as_supplied() {
        let submission = complete_submission(Some(Occupation::Employed))
            .with_document(DocumentType::Identity, doc("rg.jpg", IDENTITY));

        let report = pipeline().run(&submission);
        let identity = &report.documents_processed[0];

        assert_eq!(identity.quality_verdict, QualityVerdict::UnsupportedFormat);
        assert_eq!(identity.fields, ExtractedFields::default());
        assert!(!report
            .applicant
            .missing_required_documents
            .contains(&DocumentType::Identity));
        // the birth certificate still supplies name and tax ID
        assert_eq!(report.applicant.name.as_deref(), Some("Maria Da Silva"));
        assert_eq!(report.applicant.tax_id_valid, Some(true));
    }

    #[test]
    fn test_keeping_invalid_documents() {
        let mut config = VaiiConfig::default();
        config.quality.drop_invalid_documents = false;
        let pipeline = Pipeline::new(config, Arc::new(Utf8Extractor));

        let submission = Submission::new(None).with_document(
            DocumentType::SocialInsuranceCard,
            doc("pis.pdf", "PIS/PASEP: 120.54321.98-7"),
        );

        let report = pipeline.run(&submission);
        assert_eq!(report.documents_processed[0].quality_verdict, QualityVerdict::LowQuality);
        assert_eq!(
            report.applicant.social_insurance_number.as_deref(),
            Some("120.54321.98-7")
        );
    }

    #[test]
    fn test_formal_self_employment() {
        let without_proof =
            pipeline().run(&complete_submission(Some(Occupation::SelfEmployedFormal)));
        assert_eq!(
            without_proof
                .applicant
                .missing_required_documents
                .iter()
                .copied()
                .collect::<Vec<_>>(),
            vec![DocumentType::SelfEmploymentProof]
        );
        assert_eq!(without_proof.applicant.approval_tier(), ApprovalTier::Likely);

        let with_proof = pipeline().run(
            &complete_submission(Some(Occupation::SelfEmployedFormal)).with_document(
                DocumentType::SelfEmploymentProof,
                doc("mei.pdf", SELF_EMPLOYMENT_PROOF),
            ),
        );
        assert!(with_proof.applicant.self_employment_proof);
        assert!(with_proof.applicant.missing_required_documents.is_empty());
        assert_eq!(with_proof.applicant.approval.score, 4.5);
    }

    #[test]
    fn test_empty_submission() {
        let report = pipeline().run(&Submission::new(None));

        assert!(report.documents_processed.is_empty());
        assert_eq!(report.applicant.missing_required_documents.len(), 4);
        assert_eq!(report.applicant.estimated_benefit, None);
        assert_eq!(report.applicant.approval.score, 0.0);
        assert_eq!(report.applicant.approval_tier(), ApprovalTier::Unlikely);
    }

    #[test]
    fn test_huge_contributions_still_yield_a_report() {
        let text = "EXTRATO PREVIDENCIÁRIO CNIS\n\
            2023-01: 70000000000000000000000000000\n\
            2023-02: 70000000000000000000000000000\n";
        let submission = Submission::new(Some(Occupation::Employed))
            .with_document(DocumentType::ContributionStatement, doc("cnis.pdf", text));

        let report = pipeline().run(&submission);
        assert_eq!(report.applicant.contributions.len(), 2);
        assert_eq!(report.applicant.estimated_benefit, None);
        assert_eq!(report.applicant.approval_tier(), ApprovalTier::Unlikely);
    }

    #[test]
    fn test_run_is_deterministic() {
        let submission = complete_submission(Some(Occupation::SelfEmployedInformal));
        assert_eq!(pipeline().run(&submission), pipeline().run(&submission));
    }

    #[test]
    fn test_storage_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = || Box::new(FsDocumentStore::new(dir.path(), 20));
        let submission = complete_submission(Some(Occupation::Employed));

        let first = pipeline().with_store(store()).run(&submission);
        let second = pipeline().with_store(store()).run(&submission);

        let stored: Vec<Option<&str>> = first
            .documents_processed
            .iter()
            .map(|d| d.stored_filename.as_deref())
            .collect();
        assert_eq!(
            stored,
            vec![
                Some("52998224725_mariadasilva_identity.pdf"),
                Some("52998224725_mariadasilva_birth_certificate.pdf"),
                Some("52998224725_mariadasilva_contribution_statement.pdf"),
                Some("52998224725_mariadasilva_social_insurance_card.pdf"),
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_storage_skipped_without_identity() {
        let dir = tempfile::tempdir().unwrap();
        let submission = Submission::new(None).with_document(
            DocumentType::ContributionStatement,
            doc("cnis.pdf", &statement()),
        );

        let report = pipeline()
            .with_store(Box::new(FsDocumentStore::new(dir.path(), 20)))
            .run(&submission);

        assert_eq!(report.documents_processed[0].stored_filename, None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
