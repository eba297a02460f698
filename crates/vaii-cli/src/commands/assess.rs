//! Assess command - pre-screen one submission from its document files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use vaii_core::extraction::rules::format_amount;
use vaii_core::{
    AssessmentReport, DocumentType, FsDocumentStore, Occupation, PdfTextExtractor, Pipeline,
    Submission, SubmittedDocument,
};

use super::config::load_config;

/// Placeholder for fields that could not be extracted.
const NOT_FOUND: &str = "not found";

/// Arguments for the assess command.
#[derive(Args)]
pub struct AssessArgs {
    /// Mother's identity card (PDF)
    #[arg(long, value_name = "FILE")]
    identity: Option<PathBuf>,

    /// Child's birth certificate (PDF)
    #[arg(long, value_name = "FILE")]
    birth_certificate: Option<PathBuf>,

    /// Social-security contribution statement (PDF)
    #[arg(long, value_name = "FILE")]
    contribution_statement: Option<PathBuf>,

    /// Social-insurance registration card (PDF)
    #[arg(long, value_name = "FILE")]
    social_insurance_card: Option<PathBuf>,

    /// Proof of formal self-employment registration (PDF)
    #[arg(long, value_name = "FILE")]
    self_employment_proof: Option<PathBuf>,

    /// Declared occupation: employed, self-employed-formal,
    /// self-employed-informal, unemployed (or CLT, MEI, Autonoma, Desempregada)
    #[arg(long)]
    occupation: Option<Occupation>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Store accepted documents in this directory under their standard name
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Single-row CSV for manual portal entry
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: AssessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let window_months = config.benefit.window_months;

    let submission = build_submission(&args)?;
    info!(
        "Assessing {} documents (occupation: {})",
        submission.documents.len(),
        submission
            .occupation
            .map_or_else(|| "undeclared".to_string(), |o| o.to_string())
    );

    let name_max_len = config.storage.name_max_len;
    let mut pipeline = Pipeline::new(config, Arc::new(PdfTextExtractor::new()));
    if let Some(dir) = &args.store_dir {
        pipeline = pipeline.with_store(Box::new(FsDocumentStore::new(dir, name_max_len)));
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Checking {} documents...", submission.documents.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let report = tokio::task::spawn_blocking(move || pipeline.run(&submission)).await?;

    pb.finish_and_clear();

    let output = format_report(&report, args.format, window_months)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn build_submission(args: &AssessArgs) -> anyhow::Result<Submission> {
    let inputs = [
        (DocumentType::Identity, &args.identity),
        (DocumentType::BirthCertificate, &args.birth_certificate),
        (DocumentType::ContributionStatement, &args.contribution_statement),
        (DocumentType::SocialInsuranceCard, &args.social_insurance_card),
        (DocumentType::SelfEmploymentProof, &args.self_employment_proof),
    ];

    let mut submission = Submission::new(args.occupation);
    for (doc_type, path) in inputs {
        if let Some(path) = path {
            submission = submission.with_document(doc_type, read_document(path)?);
        }
    }

    Ok(submission)
}

fn read_document(path: &Path) -> anyhow::Result<SubmittedDocument> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    Ok(SubmittedDocument::from_path(path)?)
}

fn format_report(
    report: &AssessmentReport,
    format: OutputFormat,
    window_months: usize,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report, window_months),
        OutputFormat::Text => Ok(format_text(report, window_months)),
    }
}

fn recent_contributions(report: &AssessmentReport, window_months: usize) -> Vec<String> {
    report
        .applicant
        .recent_contributions(window_months)
        .into_iter()
        .map(|(month, amount)| format!("{}: {}", month, format_amount(amount)))
        .collect()
}

fn missing_keys(report: &AssessmentReport) -> String {
    report
        .applicant
        .missing_required_documents
        .iter()
        .map(DocumentType::key)
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_csv(report: &AssessmentReport, window_months: usize) -> anyhow::Result<String> {
    let applicant = &report.applicant;
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "name",
        "tax_id",
        "social_insurance_number",
        "recent_contributions",
        "estimated_benefit",
        "eligibility",
        "missing_documents",
        "occupation",
        "approval_tier",
    ])?;

    wtr.write_record([
        applicant.name.clone().unwrap_or_default(),
        applicant.tax_id.clone().unwrap_or_default(),
        applicant.social_insurance_number.clone().unwrap_or_default(),
        recent_contributions(report, window_months).join("; "),
        applicant.estimated_benefit.map(format_amount).unwrap_or_default(),
        applicant.eligibility.message.clone(),
        missing_keys(report),
        applicant.occupation.map(|o| o.key().to_string()).unwrap_or_default(),
        applicant.approval_tier.label().to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &AssessmentReport, window_months: usize) -> String {
    let applicant = &report.applicant;
    let mut output = String::new();

    output.push_str(&format!(
        "Applicant: {}\n",
        applicant.name.as_deref().unwrap_or(NOT_FOUND)
    ));
    match (&applicant.tax_id, applicant.tax_id_valid) {
        (Some(tax_id), Some(true)) => output.push_str(&format!("Tax ID: {} (valid)\n", tax_id)),
        (Some(tax_id), _) => output.push_str(&format!("Tax ID: {} (INVALID)\n", tax_id)),
        (None, _) => output.push_str(&format!("Tax ID: {}\n", NOT_FOUND)),
    }
    output.push_str(&format!(
        "Social insurance: {}\n",
        applicant.social_insurance_number.as_deref().unwrap_or(NOT_FOUND)
    ));
    output.push_str(&format!(
        "Occupation: {}\n",
        applicant.occupation.map_or("undeclared", |o| o.key())
    ));
    if applicant.name_consistency == vaii_core::NameConsistency::Inconsistent {
        output.push_str("Names differ between documents\n");
    }
    output.push('\n');

    let contributions = recent_contributions(report, window_months);
    if contributions.is_empty() {
        output.push_str("Contributions: none found\n");
    } else {
        output.push_str(&format!("Contributions (last {} months):\n", window_months));
        for line in &contributions {
            output.push_str(&format!("  {}\n", line));
        }
    }
    match applicant.estimated_benefit {
        Some(benefit) => {
            output.push_str(&format!("Estimated benefit: R$ {}\n", format_amount(benefit)))
        }
        None => output.push_str("Estimated benefit: not available\n"),
    }
    output.push('\n');

    output.push_str(&format!("Eligibility: {}\n", applicant.eligibility.message));
    if applicant.missing_required_documents.is_empty() {
        output.push_str("Missing documents: none\n");
    } else {
        output.push_str("Missing documents:\n");
        for doc_type in &applicant.missing_required_documents {
            output.push_str(&format!("  - {}\n", doc_type.label()));
        }
    }
    output.push_str(&format!(
        "Approval: {} (score {:.1})\n",
        applicant.approval_tier.label(),
        applicant.approval.score
    ));
    for component in &applicant.approval.components {
        output.push_str(&format!(
            "  +{:.1} {}: {}\n",
            component.points, component.factor, component.notes
        ));
    }

    if !report.documents_processed.is_empty() {
        output.push_str("\nDocuments:\n");
        for doc in &report.documents_processed {
            output.push_str(&format!(
                "  {:<24} {:<20} {:?} ({})",
                doc.doc_type.label(),
                doc.original_name,
                doc.quality_verdict,
                doc.text_quality
            ));
            if let Some(stored) = &doc.stored_filename {
                output.push_str(&format!(" -> {}", stored));
            }
            output.push('\n');
        }
    }

    output
}
