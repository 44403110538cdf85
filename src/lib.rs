pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod money;
pub mod normalize;
pub mod payload;
pub mod registry;
pub mod render;
pub mod schema;
pub mod table;
pub mod template;

pub use batch::{BatchOptions, assemble_batch, validation_report};
pub use config::{BatchArgs, CliArgs, Command, TemplateArgs, build_batch_options};
pub use error::{PipelineError, RenderError};
pub use logging::{LoggingConfig, init_logging};
pub use matcher::{DEFAULT_MATCH_THRESHOLD, EventMatcher, NameScorer, SimilarityScorer};
pub use model::{
    BatchResult, CanonicalEvent, DocumentType, IngestedRow, ResolvedPayload, RowOutcome, RowStatus,
};
pub use payload::{ResolverDefaults, Signatory, SignatoryRoster};
pub use registry::EventRegistry;
pub use render::{DocumentRenderer, RenderedDocuments, TemplateRenderer};
pub use table::{CellValue, UploadedTable};

use schema::SynonymTable;

/// Run the full pipeline over one uploaded table: schema resolution, row
/// normalization, event matching, and batch assembly.
///
/// The registry snapshot is read-only for the duration of the call; the one
/// fatal outcome is a structural error from schema resolution, raised before
/// any row is processed. Everything row-local lands in the returned
/// `BatchResult`.
pub fn run_batch(
    table: &UploadedTable,
    registry: &EventRegistry,
    options: &BatchOptions,
    renderer: &dyn DocumentRenderer,
) -> Result<BatchResult, PipelineError> {
    let columns = schema::resolve_columns(table.headers(), &SynonymTable::default())?;
    let mut rows = normalize::normalize_table(table, &columns);

    let matcher = EventMatcher::default().with_threshold(options.match_threshold);
    matcher.match_rows(&mut rows, registry);

    batch::assemble_batch(&rows, options, renderer)
}
