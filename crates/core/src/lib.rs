//! EV Tracker core data models.
//!
//! This crate defines the table snapshots, typed records and resolved
//! percentages shared by the progress, storage and page crates.

#![warn(missing_docs)]

// Identities
mod id;

// Rendered data
mod cell;
mod table;
mod page;

// Progress
mod progress;
mod work_item;
mod chart;

// Re-exports
pub use id::{SubJobId, SUB_JOB_PROGRESS_PREFIX};
pub use cell::{float_prefix, leading_number, parse_finite, percent_value};
pub use table::{normalize_header, TableKind, TableSnapshot};
pub use page::{MetricCards, PageKind};
pub use progress::{HoursPair, ProgressSource, QuantityPair, Resolution};
pub use work_item::{SubJobSummary, WorkItem};
pub use chart::{ChartTheme, RingChart};

/// Errors raised while building model values from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Identifier was empty
    #[error("empty identifier")]
    EmptyId,

    /// Page name not recognized
    #[error("unknown page: {0}")]
    UnknownPage(String),
}
