use retro_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("input error: {0}")]
    Input(String),

    #[error("report error: {0}")]
    Report(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Report(e.to_string())
    }
}
