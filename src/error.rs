use thiserror::Error;

/// Result type alias for race results operations
pub type Result<T, E = RaceResultsError> = std::result::Result<T, E>;

/// Errors surfaced by the race results Lambda
#[derive(Error, Debug)]
pub enum RaceResultsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("KMS decrypt failed: {0}")]
    Decrypt(String),

    #[error("Zwift request failed: {0}")]
    Zwift(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Response serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
