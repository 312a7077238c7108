//! In-memory cache backend, scoped to the life of the process.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CacheBackend, CacheError, Result};

/// Session-scoped cache holding entries in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<Vec<(String, String)>>,
    limit: Option<usize>,
    disabled: bool,
}

impl MemoryCache {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that refuses new keys beyond `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Create a cache that fails every operation, like storage switched off in a browser.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    fn check_enabled(&self) -> Result<()> {
        if self.disabled {
            Err(CacheError::Disabled)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_enabled()?;
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_enabled()?;
        let mut entries = self.entries.lock().await;
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
            return Ok(());
        }
        if let Some(limit) = self.limit {
            if entries.len() >= limit {
                return Err(CacheError::QuotaExceeded { limit });
            }
        }
        entries.push((key.to_string(), value.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_enabled()?;
        self.entries.lock().await.retain(|(k, _)| k != key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.check_enabled()?;
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
