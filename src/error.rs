//! Error handling

use thiserror::Error;

pub type ScanResult<T> = Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed URL
    #[error("Invalid URL: {0}")]
    Parse(String),

    /// A parameter blob could not be loaded or failed validation
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The mandatory neural path failed
    #[error("Scoring failed: {0}")]
    ScoringFailure(String),

    /// The caller-imposed deadline elapsed; terminal, never retried
    #[error("Scan timed out after {0}s")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Json(err.to_string())
    }
}

impl From<url::ParseError> for ScanError {
    fn from(err: url::ParseError) -> Self {
        ScanError::Parse(err.to_string())
    }
}
