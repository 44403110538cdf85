//! Error taxonomy for the batch pipeline.
//!
//! Only structural problems abort a run and surface as `Err` values from the
//! pipeline entry points. Everything row-local (validation, matching,
//! resolution, generation) accumulates as text on the row and is reported
//! through `RowOutcome`; no per-row failure ever unwinds a batch.

use thiserror::Error;

/// Fatal, non-per-row failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required canonical columns absent from the uploaded table. Raised
    /// once, before any row processing begins.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("failed to read uploaded table: {0}")]
    TableRead(String),

    #[error("failed to load event registry: {0}")]
    RegistryLoad(String),

    #[error("failed to write archive: {0}")]
    Archive(String),

    #[error("failed to build upload template: {0}")]
    Template(String),
}

impl PipelineError {
    /// Coarse category for logs.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::MissingColumns(_) => "structural",
            PipelineError::TableRead(_) | PipelineError::RegistryLoad(_) => "input",
            PipelineError::Archive(_) | PipelineError::Template(_) => "output",
        }
    }
}

/// Failure reported by the document-rendering collaborator for one row.
///
/// The message is passed through to the row outcome verbatim, never
/// reinterpreted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<tera::Error> for RenderError {
    fn from(err: tera::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_field() {
        let err = PipelineError::MissingColumns(vec![
            "companyName".to_string(),
            "total".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing required columns: companyName, total"
        );
        assert_eq!(err.category(), "structural");
    }

    #[test]
    fn render_error_passes_message_through() {
        let err = RenderError::new("template variable 'venue' missing");
        assert_eq!(err.to_string(), "template variable 'venue' missing");
    }
}
