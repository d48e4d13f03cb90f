use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::model::GradeRecord;

pub fn write_csv(records: &[GradeRecord], path: &Path) -> Result<(), AppError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::Report(format!("failed to flush {}: {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "csv report written");
    Ok(())
}

pub fn write_json(records: &[GradeRecord], path: &Path) -> Result<(), AppError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| AppError::Report(format!("failed to serialize results: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| AppError::Report(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "json report written");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Report(format!("failed to create {}: {e}", parent.display()))),
        _ => Ok(()),
    }
}
