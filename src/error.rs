use thiserror::Error;

/// Main error type for the edge finder
#[derive(Error, Debug)]
pub enum EdgeError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Feed errors
    #[error("Feed unavailable: {0}")]
    FeedUnavailable(String),

    // Position book errors
    #[error("Position not found at index {0}")]
    PositionNotFound(usize),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for EdgeError
pub type Result<T> = std::result::Result<T, EdgeError>;
