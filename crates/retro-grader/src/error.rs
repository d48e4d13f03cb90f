use retro_common::error::CommonError;
use retro_common::completion::CompletionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("config error: {0}")]
    Config(String),

    /// The model answered, but not with a usable grade. `raw` holds the content as received.
    #[error("model response could not be parsed as a grade: {source}\n--- raw response ---\n{raw}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("score {score} outside 0..=5\n--- raw response ---\n{raw}")]
    ScoreOutOfRange { score: i64, raw: String },

    #[error("report error: {0}")]
    Report(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Report(e.to_string())
    }
}
