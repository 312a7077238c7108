//! JSON file cache backend.
//!
//! Keeps every entry in a single JSON document so values survive across
//! runs, like browser local storage. Each entry carries an `updated_at`
//! marker.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::{CacheBackend, Result};

/// One stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Lookup key
    pub key: String,

    /// Stored text
    pub value: String,

    /// When the value was last written
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: Vec<CacheEntry>,
}

/// File-based JSON cache backend.
pub struct JsonFileCache {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl JsonFileCache {
    /// Open a cache stored at `path`. The parent directory is created if
    /// needed; the file itself is created on first write.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// All entries with their timestamps.
    pub async fn entries(&self) -> Result<Vec<CacheEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.entries)
    }

    async fn read(&self) -> Result<CacheFile> {
        match fs::read_to_string(&self.path).await {
            Ok(json) if json.trim().is_empty() => Ok(CacheFile::default()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &CacheFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for JsonFileCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let file = self.read().await?;
        Ok(file
            .entries
            .into_iter()
            .find(|e| e.key == key)
            .map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        let now = Utc::now();
        match file.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.value = value.to_string();
                entry.updated_at = now;
            }
            None => file.entries.push(CacheEntry {
                key: key.to_string(),
                value: value.to_string(),
                updated_at: now,
            }),
        }
        self.write(&file).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        let before = file.entries.len();
        file.entries.retain(|e| e.key != key);
        if file.entries.len() != before {
            self.write(&file).await?;
        }
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;
        let file = self.read().await?;
        Ok(file
            .entries
            .into_iter()
            .filter(|e| e.key.starts_with(prefix))
            .map(|e| e.key)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let cache = JsonFileCache::new(&path).await.unwrap();
        cache.set("subJobProgress_4", "61.5").await.unwrap();
        drop(cache);

        let reopened = JsonFileCache::new(&path).await.unwrap();
        assert_eq!(
            reopened.get("subJobProgress_4").await.unwrap(),
            Some("61.5".to_string())
        );
        assert_eq!(reopened.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("cache.json")).await.unwrap();
        assert_eq!(cache.get("anything").await.unwrap(), None);
        assert!(cache.keys_with_prefix("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let cache = JsonFileCache::new(dir.path().join("cache.json")).await.unwrap();
        cache.set("a", "1").await.unwrap();
        cache.set("b", "2").await.unwrap();
        cache.set("a", "3").await.unwrap();
        cache.remove("b").await.unwrap();
        cache.remove("missing").await.unwrap();
        assert_eq!(cache.keys_with_prefix("").await.unwrap(), vec!["a"]);
        assert_eq!(cache.get("a").await.unwrap(), Some("3".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        let cache = JsonFileCache::new(&path).await.unwrap();
        assert!(matches!(cache.get("a").await, Err(CacheError::Json(_))));
    }
}
