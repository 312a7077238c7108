//! Errors at the page layer's outer seams.

use std::time::Duration;

/// Error type for remote progress requests.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors from the progress API client.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport or decoding failure, including non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No answer within the timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Base URL or request path could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Sub job id that cannot name a path segment
    #[error("sub job id cannot be used in a URL: {0}")]
    InvalidId(String),

    /// The API answered with a value that is not a finite number
    #[error("non-finite progress for sub job {0}")]
    NonFinite(String),
}

/// Errors while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
