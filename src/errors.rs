use thiserror::Error;

/// Error type that captures report fetching and configuration failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ReportResult<T> = Result<T, ReportError>;
