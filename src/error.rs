use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("regression model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not parse data file: {0}")]
    FileParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoreError {
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        ScoreError::ModelUnavailable {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
