mod categorize;
mod dump;
mod error;
mod model;
mod sections;
mod summary;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use retro_common::corpus;
use retro_common::document::{Document, SUPPORTED_EXTENSIONS};

use model::FeedbackSpan;

/// Summarize student feedback found in retrospectives into a themed markdown report.
#[derive(Debug, Parser)]
#[command(name = "feedback-summary", version)]
struct Cli {
    /// Retrospective files or folders to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Markdown report path
    #[arg(long, short, default_value = "results/professor-feedback.md")]
    output: PathBuf,

    /// Report title
    #[arg(long, default_value = "Professor Feedback Summary")]
    title: String,

    /// Also write each document's text and extracted spans here
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let mut files = Vec::new();
    for path in &cli.paths {
        match corpus::discover(path, SUPPORTED_EXTENSIONS) {
            Ok(found) => files.extend(found),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping path"),
        }
    }
    if files.is_empty() {
        warn!("no .docx or .pdf files found");
        return Ok(());
    }

    let mut documents: Vec<Document> = Vec::new();
    let mut all_spans: Vec<FeedbackSpan> = Vec::new();
    for file in &files {
        match Document::load(file) {
            Ok(doc) => {
                let spans = sections::extract_spans(&doc);
                info!(file = %doc.name, spans = spans.len(), "feedback extracted");
                all_spans.extend(spans);
                documents.push(doc);
            }
            Err(e) => error!(file = %file.display(), error = %e, "failed to read document"),
        }
    }
    info!(
        documents = documents.len(),
        spans = all_spans.len(),
        "extraction finished"
    );

    let categorized = categorize::categorize(&all_spans);
    info!(categorized = categorized.total(), "feedback categorized");
    let lines = summary::render(&categorized, &cli.title, documents.len());
    summary::write_summary(&cli.output, &lines)?;

    if let Some(path) = &cli.dump {
        dump::write_dump(path, &documents, &all_spans)?;
    }
    Ok(())
}
