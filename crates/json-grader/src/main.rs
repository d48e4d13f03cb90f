mod error;
mod model;
mod report;
mod rubric;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use retro_common::corpus;

use error::AppError;
use report::RunStats;

/// Grade JSON setup-assignment submissions and write the results to CSV.
#[derive(Debug, Parser)]
#[command(name = "json-grader", version)]
struct Cli {
    /// Folder containing the student .json submissions
    input_dir: PathBuf,

    /// CSV file to write
    output_csv: PathBuf,
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

    if !cli.input_dir.is_dir() {
        return Err(AppError::Input(format!(
            "'{}' does not exist or is not a directory",
            cli.input_dir.display()
        ))
        .into());
    }

    let files = corpus::discover(&cli.input_dir, &["json"])?;
    if files.is_empty() {
        warn!(dir = %cli.input_dir.display(), "no JSON files found");
        return Ok(());
    }
    info!(count = files.len(), "grading JSON submissions");

    let grades: Vec<_> = files
        .iter()
        .map(|file| {
            let grade = rubric::grade_submission(file);
            info!(file = %grade.filename, score = grade.score, "graded");
            grade
        })
        .collect();

    report::write_csv(&grades, &cli.output_csv)?;

    let stats = RunStats::from_grades(&grades);
    let average = format!("{:.2}/5.00", stats.average);
    info!(
        path = %cli.output_csv.display(),
        total = stats.total,
        perfect = stats.perfect,
        average = %average,
        "grading complete"
    );
    Ok(())
}
