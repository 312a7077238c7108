//! Progress cache facade that never fails its caller.

use std::sync::Arc;

use evtrack_core::{SubJobId, SUB_JOB_PROGRESS_PREFIX};
use tracing::{debug, warn};

use super::CacheBackend;

/// Carries resolved percentages from one page or call to another.
///
/// Backend failures (quota, disabled storage, I/O) are logged and treated
/// as a miss or a dropped write.
#[derive(Clone)]
pub struct ProgressCache {
    backend: Arc<dyn CacheBackend>,
}

impl ProgressCache {
    /// Wrap a backend.
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Read a value; any failure reads as a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => {
                debug!(key, hit = value.is_some(), "cache lookup");
                value
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Write a value; any failure is dropped.
    pub async fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value).await {
            warn!(key, error = %e, "cache write failed");
        }
    }

    /// Remove a value; any failure is dropped.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key).await {
            warn!(key, error = %e, "cache remove failed");
        }
    }

    /// Keys starting with `prefix`; any failure reads as none.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.backend
            .keys_with_prefix(prefix)
            .await
            .unwrap_or_else(|e| {
                warn!(prefix, error = %e, "cache scan failed");
                Vec::new()
            })
    }

    /// Cached progress text for a sub job.
    pub async fn sub_job_progress(&self, id: &SubJobId) -> Option<String> {
        self.get(&id.cache_key()).await
    }

    /// Remember a sub job's resolved percentage.
    pub async fn store_sub_job_progress(&self, id: &SubJobId, percent: f64) {
        self.set(&id.cache_key(), &percent.to_string()).await;
    }

    /// The first cached sub-job entry, whatever its id.
    pub async fn any_sub_job_progress(&self) -> Option<(SubJobId, String)> {
        for key in self.keys_with_prefix(SUB_JOB_PROGRESS_PREFIX).await {
            let Some(id) = SubJobId::from_cache_key(&key) else {
                continue;
            };
            if let Some(value) = self.get(&key).await {
                return Some((id, value));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let cache = ProgressCache::new(MemoryCache::disabled());
        cache.set("k", "1").await;
        assert_eq!(cache.get("k").await, None);
        assert!(cache.keys_with_prefix("").await.is_empty());
        assert_eq!(cache.any_sub_job_progress().await, None);
    }

    #[tokio::test]
    async fn test_quota_drops_write() {
        let cache = ProgressCache::new(MemoryCache::with_limit(0));
        let id = SubJobId::new("3").unwrap();
        cache.store_sub_job_progress(&id, 55.0).await;
        assert_eq!(cache.sub_job_progress(&id).await, None);
    }

    #[tokio::test]
    async fn test_sub_job_roundtrip_and_any() {
        let cache = ProgressCache::new(MemoryCache::new());
        cache.set("theme", "dark").await;
        cache.remove("theme").await;
        assert_eq!(cache.get("theme").await, None);
        let id = SubJobId::new("SJ-2").unwrap();
        cache.store_sub_job_progress(&id, 37.5).await;

        assert_eq!(cache.sub_job_progress(&id).await, Some("37.5".to_string()));
        assert_eq!(
            cache.any_sub_job_progress().await,
            Some((id, "37.5".to_string()))
        );
    }
}
