use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Not enough statistics yet to generate a good exercise ({available} of {required} trigrams scored), train longer first")]
    InsufficientData { available: usize, required: usize },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp Parsing Error: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl TrainerError {
    /// Storage errors come from reading or writing the data directory.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            TrainerError::Io(_) | TrainerError::Json(_) | TrainerError::Timestamp(_)
        )
    }
}

pub type TrainerResult<T> = Result<T, TrainerError>;
