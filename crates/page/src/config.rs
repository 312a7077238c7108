//! Configuration for page resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use evtrack_core::PageKind;
use evtrack_storage::{JsonFileCache, MemoryCache, ProgressCache};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Top-level configuration, loaded from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvTrackConfig {
    /// Fallback percentage per page
    pub defaults: PageDefaults,

    /// Where cross-page progress is kept
    pub cache: CacheConfig,

    /// Base URL of the progress API, if one is available
    pub api_base: Option<String>,

    /// Timeout for progress API requests, in milliseconds
    pub fetch_timeout_ms: u64,

    /// How long to wait for page data to be ready, in milliseconds
    pub ready_timeout_ms: u64,
}

impl Default for EvTrackConfig {
    fn default() -> Self {
        Self {
            defaults: PageDefaults::default(),
            cache: CacheConfig::default(),
            api_base: None,
            fetch_timeout_ms: 5_000,
            ready_timeout_ms: 2_000,
        }
    }
}

impl EvTrackConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Progress API timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Ready-signal timeout.
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Open the configured cache. A backend that cannot be opened is
    /// replaced by an in-memory one.
    pub async fn open_cache(&self) -> ProgressCache {
        match &self.cache {
            CacheConfig::Memory { limit } => match limit {
                Some(limit) => ProgressCache::new(MemoryCache::with_limit(*limit)),
                None => ProgressCache::new(MemoryCache::new()),
            },
            CacheConfig::Json { path } => match JsonFileCache::new(path).await {
                Ok(cache) => ProgressCache::new(cache),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "cannot open cache file, using memory"
                    );
                    ProgressCache::new(MemoryCache::new())
                }
            },
        }
    }
}

/// Fallback percentage shown on each page when nothing resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDefaults {
    /// Dashboard fallback
    pub dashboard: f64,

    /// Project overview fallback
    pub project: f64,

    /// Sub-job overview fallback
    pub sub_job: f64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            dashboard: PageKind::Dashboard.default_percent(),
            project: PageKind::ProjectOverview.default_percent(),
            sub_job: PageKind::SubJobOverview.default_percent(),
        }
    }
}

impl PageDefaults {
    /// Fallback for one page.
    pub fn for_page(&self, kind: PageKind) -> f64 {
        match kind {
            PageKind::Dashboard => self.dashboard,
            PageKind::ProjectOverview => self.project,
            PageKind::SubJobOverview => self.sub_job,
        }
    }
}

/// Cache backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum CacheConfig {
    /// Process-scoped, optionally bounded
    Memory {
        /// Maximum number of entries
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Persisted in a JSON file
    Json {
        /// File location
        path: PathBuf,
    },
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::Memory { limit: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvTrackConfig::default();
        assert_eq!(config.defaults.for_page(PageKind::Dashboard), 0.0);
        assert_eq!(config.defaults.for_page(PageKind::ProjectOverview), 48.0);
        assert_eq!(config.defaults.for_page(PageKind::SubJobOverview), 32.0);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_json() {
        let config = EvTrackConfig::from_json(
            r#"{
                "defaults": { "project": 10 },
                "cache": { "backend": "json", "path": "/tmp/evtrack.json" },
                "api_base": "http://localhost:5000"
            }"#,
        )
        .unwrap();
        assert_eq!(config.defaults.project, 10.0);
        assert_eq!(config.defaults.sub_job, 32.0);
        assert_eq!(
            config.cache,
            CacheConfig::Json { path: PathBuf::from("/tmp/evtrack.json") }
        );
        assert_eq!(config.ready_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EvTrackConfig::from_json("{ defaults"),
            Err(ConfigError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_open_json_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = EvTrackConfig {
            cache: CacheConfig::Json { path: dir.path().join("cache.json") },
            ..EvTrackConfig::default()
        };
        let cache = config.open_cache().await;
        cache.set("k", "v").await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));
        assert!(dir.path().join("cache.json").exists());
    }
}
