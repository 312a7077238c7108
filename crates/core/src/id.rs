//! Identifiers for tracked entities.

use serde::{Deserialize, Serialize};

/// Prefix shared by every cached sub-job progress entry.
pub const SUB_JOB_PROGRESS_PREFIX: &str = "subJobProgress_";

/// Identifier of a sub job, as rendered in the first column of a sub-jobs table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubJobId(String);

impl SubJobId {
    /// Create from raw text. Returns `None` when nothing but whitespace is given.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Take the first whitespace-delimited token of a cell, e.g. `"SJ-01 Earthworks"`.
    pub fn from_cell(cell: &str) -> Option<Self> {
        cell.split_whitespace().next().and_then(Self::new)
    }

    /// Key under which this sub job's progress is cached.
    pub fn cache_key(&self) -> String {
        format!("{}{}", SUB_JOB_PROGRESS_PREFIX, self.0)
    }

    /// Recover the id from a cache key.
    pub fn from_cache_key(key: &str) -> Option<Self> {
        key.strip_prefix(SUB_JOB_PROGRESS_PREFIX).and_then(Self::new)
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SubJobId {
    type Err = crate::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| crate::ModelError::EmptyId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell_takes_first_token() {
        let id = SubJobId::from_cell("  SJ-01 Earthworks ").unwrap();
        assert_eq!(id.as_str(), "SJ-01");
    }

    #[test]
    fn test_cache_key_roundtrip() {
        let id = SubJobId::new("17").unwrap();
        assert_eq!(id.cache_key(), "subJobProgress_17");
        assert_eq!(SubJobId::from_cache_key("subJobProgress_17"), Some(id));
        assert_eq!(SubJobId::from_cache_key("other_17"), None);
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(SubJobId::new("   ").is_none());
        assert!("".parse::<SubJobId>().is_err());
    }
}
