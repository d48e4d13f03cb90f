use std::path::PathBuf;

/// Error types shared across the grading binaries.
///
/// These cover reading student submissions from disk. Each binary defines its own
/// `AppError` and wraps `CommonError` via `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf extraction failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("docx extraction failed for {path}: {message}")]
    Docx { path: PathBuf, message: String },

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),
}
