use std::path::Path;

use crate::error::AppError;
use crate::model::{SubmissionGrade, MAX_SCORE};

/// Totals logged after a grading run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub total: usize,
    pub perfect: usize,
    pub average: f64,
}

impl RunStats {
    pub fn from_grades(grades: &[SubmissionGrade]) -> Self {
        let total = grades.len();
        let perfect = grades.iter().filter(|g| g.score == MAX_SCORE).count();
        let average = if total == 0 {
            0.0
        } else {
            grades.iter().map(|g| f64::from(g.score)).sum::<f64>() / total as f64
        };
        Self {
            total,
            perfect,
            average,
        }
    }
}

pub fn write_csv(grades: &[SubmissionGrade], path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Report(format!("failed to create {}: {e}", parent.display())))?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for grade in grades {
        writer.serialize(grade)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::Report(format!("failed to flush {}: {e}", path.display())))?;
    Ok(())
}
