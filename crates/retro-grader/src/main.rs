mod config;
mod error;
mod grader;
mod model;
mod report;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use retro_common::corpus;
use retro_common::document::{Document, SUPPORTED_EXTENSIONS};
use retro_common::completion::{CompletionClient, EndpointSettings};

use config::Config;
use error::AppError;
use model::GradeRecord;

/// Grade sprint retrospectives (.docx / .pdf) against the five-point rubric.
#[derive(Debug, Parser)]
#[command(name = "retro-grader", version)]
struct Cli {
    /// Path to a retrospective file or a folder of them
    path: PathBuf,

    /// Write results as CSV
    #[arg(
        long,
        visible_alias = "save",
        num_args = 0..=1,
        default_missing_value = "results/grading_results.csv"
    )]
    csv: Option<PathBuf>,

    /// Write results as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "results/grading_results.json")]
    json: Option<PathBuf>,

    /// Prompt template file with a single {text} placeholder
    #[arg(long)]
    prompt: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the per-file results; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.prompt.as_deref())?;
    let endpoint = EndpointSettings::from_env();
    info!(
        model = %config.model,
        base_url = %endpoint.base_url,
        max_retries = endpoint.max_retries,
        templated = config.prompt_template.is_some(),
        "configuration loaded"
    );
    let client = CompletionClient::new(endpoint, config.api_key.clone())?;

    let files = corpus::discover(&cli.path, SUPPORTED_EXTENSIONS)?;
    if files.is_empty() {
        warn!(path = %cli.path.display(), "no .docx or .pdf files found");
        return Ok(());
    }

    let mut records = Vec::new();
    for file in &files {
        match grade_file(&client, &config, file).await {
            Ok(record) => records.push(record),
            Err(e) => error!(file = %file.display(), error = %e, "failed to grade file"),
        }
    }
    info!(graded = records.len(), total = files.len(), "grading finished");

    if records.is_empty() {
        return Ok(());
    }
    if let Some(path) = &cli.csv {
        report::write_csv(&records, path)?;
    }
    if let Some(path) = &cli.json {
        report::write_json(&records, path)?;
    }
    Ok(())
}

async fn grade_file(
    client: &CompletionClient,
    config: &Config,
    path: &Path,
) -> Result<GradeRecord, AppError> {
    info!(file = %path.display(), "reading");
    let document = Document::load(path)?;

    info!(file = %document.name, "grading");
    let grade = grader::evaluate(
        client,
        &config.model,
        &document.text,
        config.prompt_template.as_deref(),
    )
    .await?;

    let rendered = serde_json::to_string_pretty(&grade)
        .map_err(|e| AppError::Report(format!("failed to render result: {e}")))?;
    println!("Result for {}:\n{rendered}", document.name);

    Ok(GradeRecord::new(document.name, &grade))
}
