//! Cache backend trait abstraction.

use async_trait::async_trait;

/// Error type for cache backend operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors that can occur inside a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend refused to hold more entries
    #[error("quota exceeded: {limit} entries")]
    QuotaExceeded {
        /// Maximum number of entries
        limit: usize,
    },

    /// Storage is switched off
    #[error("storage disabled")]
    Disabled,
}

/// Key-value store for progress values carried between pages.
///
/// Backends report their failures; callers that must never fail go through
/// [`crate::ProgressCache`].
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, in insertion order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
