//! Table snapshot model - rendered headers and rows, aligned by column index.

use serde::{Deserialize, Serialize};

/// A structured copy of a rendered table.
///
/// Rows may be shorter than the header list; a missing cell is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Column headers in display order
    pub headers: Vec<String>,

    /// Data rows, each a list of cell texts
    pub rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    /// Create a snapshot from headers and rows.
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Headers lowercased and trimmed, ready for substring matching.
    pub fn normalized_headers(&self) -> impl Iterator<Item = String> + '_ {
        self.headers.iter().map(|h| normalize_header(h))
    }

    /// Cell text at `row`/`column`, if the row has that many cells.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Iterate the cells of one column, skipping rows that lack it.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column).map(String::as_str))
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any header contains `needle` (case-insensitive).
    pub fn has_header_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.normalized_headers().any(|h| h.contains(&needle))
    }

    /// Whether this table carries the header signature of `kind`.
    pub fn is_kind(&self, kind: TableKind) -> bool {
        kind.signature()
            .iter()
            .any(|needle| self.has_header_containing(needle))
    }
}

/// Lowercase and trim a header for matching.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// The kinds of table a page can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Work items with quantities and hours
    WorkItems,
    /// Sub jobs with a progress column
    SubJobs,
}

impl TableKind {
    /// Header fragments that identify the kind.
    pub fn signature(&self) -> &'static [&'static str] {
        match self {
            TableKind::WorkItems => &["work item", "cost code"],
            TableKind::SubJobs => &["sub job", "id"],
        }
    }
}
