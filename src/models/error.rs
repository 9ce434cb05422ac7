use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankTrackerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing field `{field}` in feed for {player}")]
    MissingField { player: String, field: String },

    #[error("API error for {player}: {message}")]
    ApiError { player: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),
}

impl RankTrackerError {
    pub fn missing(player: &str, field: &str) -> Self {
        RankTrackerError::MissingField {
            player: player.to_string(),
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankTrackerError>;
