use anyhow::{Context, Result};
use clap::Parser;
use sponsor_letters::{
    BatchArgs, CliArgs, Command, EventRegistry, LoggingConfig, TemplateArgs, TemplateRenderer,
    UploadedTable, build_batch_options, init_logging, run_batch, template, validation_report,
};
use std::fs;

fn main() -> Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let cli = CliArgs::parse();
    match cli.command {
        Command::Batch(args) => run_batch_command(args),
        Command::Template(args) => run_template_command(args),
    }
}

fn run_batch_command(args: BatchArgs) -> Result<()> {
    let options = build_batch_options(&args)?;
    let table = UploadedTable::from_xlsx_path(&args.input)?;
    let registry = EventRegistry::from_file(&args.registry)?;

    tracing::info!(
        input = %args.input.display(),
        rows = table.row_count(),
        events = registry.len(),
        document_type = %options.document_type,
        "starting batch run"
    );

    let renderer = TemplateRenderer::new()?;
    let result = run_batch(&table, &registry, &options, &renderer)?;

    fs::write(&args.output, &result.archive)
        .with_context(|| format!("failed to write archive {:?}", args.output))?;

    let report = validation_report(&result);
    match args.report.as_ref() {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("failed to write report {:?}", path))?,
        None => println!("{report}"),
    }

    tracing::info!(
        successes = result.success_count,
        failures = result.failure_count,
        archive = %args.output.display(),
        "batch complete"
    );
    Ok(())
}

fn run_template_command(args: TemplateArgs) -> Result<()> {
    let bytes = template::build_upload_template()?;
    fs::write(&args.output, bytes)
        .with_context(|| format!("failed to write template {:?}", args.output))?;
    tracing::info!(path = %args.output.display(), "upload template written");
    Ok(())
}
