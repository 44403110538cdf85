//! Batch assembly: per-row orchestration, partial-failure isolation, and
//! result packaging.
//!
//! Rows are processed strictly in original table order; that order carries
//! through to both the archive entries and the outcome report. No row's
//! failure ever aborts the batch; the only fatal path is schema resolution,
//! which prevents the batch from starting at all.

use crate::archive::{ArchiveBuilder, entry_base_name};
use crate::error::PipelineError;
use crate::model::{BatchResult, DocumentType, IngestedRow, RowOutcome, RowStatus};
use crate::payload::{ResolverDefaults, SignatoryRoster, resolve_payload};
use crate::render::DocumentRenderer;

/// Run parameters for one batch invocation.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub document_type: DocumentType,
    pub signatory_key: String,
    pub match_threshold: f64,
    pub roster: SignatoryRoster,
    pub defaults: ResolverDefaults,
}

impl Default for BatchOptions {
    fn default() -> Self {
        let roster = SignatoryRoster::default();
        Self {
            document_type: DocumentType::Lor,
            signatory_key: roster.default_key().to_string(),
            match_threshold: crate::matcher::DEFAULT_MATCH_THRESHOLD,
            roster,
            defaults: ResolverDefaults::default(),
        }
    }
}

/// Process every row (post matching) into one `BatchResult`.
///
/// Rows already carrying errors are counted as failures without touching
/// resolution or the renderer. Renderer failures pass the collaborator's
/// message through as the row detail and the batch continues.
pub fn assemble_batch(
    rows: &[IngestedRow],
    options: &BatchOptions,
    renderer: &dyn DocumentRenderer,
) -> Result<BatchResult, PipelineError> {
    let mut builder = ArchiveBuilder::new();
    let mut outcomes = Vec::with_capacity(rows.len());
    let mut success_count = 0usize;
    let mut failure_count = 0usize;

    for row in rows {
        let outcome = process_row(row, options, renderer, &mut builder)?;
        if outcome.is_success() {
            success_count += 1;
        } else {
            failure_count += 1;
        }
        outcomes.push(outcome);
    }

    let archive = builder.finish()?;
    tracing::info!(
        rows = rows.len(),
        successes = success_count,
        failures = failure_count,
        "batch assembled"
    );

    Ok(BatchResult {
        archive,
        success_count,
        failure_count,
        outcomes,
    })
}

fn process_row(
    row: &IngestedRow,
    options: &BatchOptions,
    renderer: &dyn DocumentRenderer,
    builder: &mut ArchiveBuilder,
) -> Result<RowOutcome, PipelineError> {
    if row.has_errors() {
        return Ok(failure(row, row.error_detail()));
    }

    let payload = match resolve_payload(
        row,
        options.document_type,
        &options.signatory_key,
        &options.roster,
        &options.defaults,
    ) {
        Ok(payload) => payload,
        Err(err) => return Ok(failure(row, err.to_string())),
    };

    let documents = match renderer.render(&payload) {
        Ok(documents) => documents,
        Err(err) => {
            tracing::warn!(row = row.row_number, error = %err, "document generation failed");
            return Ok(failure(row, err.to_string()));
        }
    };

    let base = entry_base_name(
        options.document_type,
        &payload.company_name,
        &payload.meeting_name,
    );
    let entry = builder.add_documents(&base, row.row_number, renderer.extensions(), &documents)?;

    Ok(RowOutcome {
        row_number: row.row_number,
        company_name: row.raw_company_name.clone(),
        status: RowStatus::Success,
        detail: format!("Generated {entry}"),
    })
}

fn failure(row: &IngestedRow, detail: String) -> RowOutcome {
    RowOutcome {
        row_number: row.row_number,
        company_name: row.raw_company_name.clone(),
        status: RowStatus::Error,
        detail,
    }
}

/// Markdown validation report over a batch result, suitable for showing an
/// uploader which rows to fix and resubmit.
pub fn validation_report(result: &BatchResult) -> String {
    let mut lines = vec!["# Validation Report".to_string(), String::new()];

    lines.push(format!("**Total Rows**: {}", result.outcomes.len()));
    lines.push(format!("**Generated**: {}", result.success_count));
    lines.push(format!("**Rows with Errors**: {}", result.failure_count));
    lines.push(String::new());

    let failures: Vec<&RowOutcome> =
        result.outcomes.iter().filter(|o| !o.is_success()).collect();
    if !failures.is_empty() {
        lines.push("## Errors".to_string());
        lines.push(String::new());
        for outcome in failures {
            let who = if outcome.company_name.is_empty() {
                "(no company name)"
            } else {
                outcome.company_name.as_str()
            };
            lines.push(format!(
                "- **Row {}** {}: {}",
                outcome.row_number, who, outcome.detail
            ));
        }
        lines.push(String::new());
    }

    let successes: Vec<&RowOutcome> =
        result.outcomes.iter().filter(|o| o.is_success()).collect();
    if !successes.is_empty() {
        lines.push("## Generated Documents".to_string());
        lines.push(String::new());
        for outcome in successes {
            lines.push(format!(
                "- **Row {}** {}: {}",
                outcome.row_number, outcome.company_name, outcome.detail
            ));
        }
    }

    lines.join("\n")
}
