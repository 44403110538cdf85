use crate::batch::BatchOptions;
use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::model::DocumentType;
use crate::payload::{ResolverDefaults, Signatory, SignatoryRoster};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sponsor-letters", about = "Bulk sponsorship letter generation", version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process an uploaded spreadsheet into a letter archive
    Batch(BatchArgs),
    /// Write the XLSX upload template
    Template(TemplateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "SPONSOR_LETTERS_INPUT",
        value_name = "FILE",
        help = "Uploaded spreadsheet to process"
    )]
    pub input: PathBuf,

    #[arg(
        long,
        env = "SPONSOR_LETTERS_REGISTRY",
        value_name = "FILE",
        help = "Event registry snapshot (YAML or JSON)"
    )]
    pub registry: PathBuf,

    #[arg(
        long,
        value_name = "TYPE",
        help = "Document type to generate (LOR or LOA)"
    )]
    pub document_type: Option<String>,

    #[arg(
        long,
        value_name = "KEY",
        help = "Signatory roster key for LOA signature lines"
    )]
    pub signatory: Option<String>,

    #[arg(
        long,
        value_name = "SCORE",
        help = "Event match acceptance threshold (0.0 to 1.0)"
    )]
    pub match_threshold: Option<f64>,

    #[arg(
        long,
        value_name = "FILE",
        default_value = "letters.zip",
        help = "Where to write the document archive"
    )]
    pub output: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Write the Markdown validation report here instead of stdout"
    )]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    #[arg(
        long,
        value_name = "FILE",
        default_value = "upload_template.xlsx",
        help = "Where to write the upload template"
    )]
    pub output: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    document_type: Option<String>,
    signatory: Option<String>,
    match_threshold: Option<f64>,
    audience: Option<Vec<String>>,
    signatories: Option<IndexMap<String, Signatory>>,
    default_signatory: Option<String>,
}

/// Merge CLI arguments over config-file values over defaults into the run
/// options for one batch.
pub fn build_batch_options(args: &BatchArgs) -> Result<BatchOptions> {
    let file_config = if let Some(path) = args.config.as_ref() {
        load_config_file(path)?
    } else {
        PartialConfig::default()
    };

    let document_type = args
        .document_type
        .as_deref()
        .or(file_config.document_type.as_deref())
        .map(|value| DocumentType::parse(value).map_err(anyhow::Error::msg))
        .transpose()?
        .unwrap_or(DocumentType::Lor);

    let roster = match file_config.signatories {
        Some(signers) => {
            anyhow::ensure!(!signers.is_empty(), "signatory roster has no entries");
            let default_key = file_config
                .default_signatory
                .unwrap_or_else(|| signers.keys().next().cloned().unwrap_or_default());
            anyhow::ensure!(
                signers.contains_key(&default_key),
                "default signatory '{default_key}' is not in the roster"
            );
            SignatoryRoster::new(signers, default_key)
        }
        None => SignatoryRoster::default(),
    };

    let signatory_key = args
        .signatory
        .clone()
        .or(file_config.signatory)
        .unwrap_or_else(|| roster.default_key().to_string());

    let match_threshold = args
        .match_threshold
        .or(file_config.match_threshold)
        .unwrap_or(DEFAULT_MATCH_THRESHOLD);
    anyhow::ensure!(
        (0.0..=1.0).contains(&match_threshold),
        "match threshold must be between 0.0 and 1.0, got {match_threshold}"
    );

    let defaults = file_config
        .audience
        .map(|audience| ResolverDefaults { audience })
        .unwrap_or_default();

    Ok(BatchOptions {
        document_type,
        signatory_key,
        match_threshold,
        roster,
        defaults,
    })
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
