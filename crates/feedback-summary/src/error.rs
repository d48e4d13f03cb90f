#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
