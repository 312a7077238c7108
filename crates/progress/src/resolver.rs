//! Progress resolution over rendered tables.
//!
//! Tiers are tried in a fixed order and each at most once:
//! quantities, then the progress column, then hours, then the cached
//! value, then the caller's default. Unreadable cells count as zero and
//! never abort a tier.

use evtrack_core::{
    leading_number, percent_value, HoursPair, ProgressSource, QuantityPair, Resolution,
    TableSnapshot,
};
use tracing::debug;

use crate::columns::ColumnMap;

/// Resolves a completion percentage from a table snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressResolver;

impl ProgressResolver {
    /// Create a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolve a percentage, always producing a value.
    ///
    /// `cached` is text carried over from another page or call; it is used
    /// only when the table yields nothing and it parses as a finite number.
    pub fn resolve(
        &self,
        snapshot: Option<&TableSnapshot>,
        cached: Option<&str>,
        default: f64,
    ) -> Resolution {
        if let Some(resolution) = snapshot.and_then(|s| self.resolve_table(s)) {
            debug!(
                source = %resolution.source,
                percent = resolution.percent,
                "resolved from table"
            );
            return resolution;
        }
        fallback(cached, default)
    }

    /// The table tiers only: quantities, progress column, hours.
    pub fn resolve_table(&self, snapshot: &TableSnapshot) -> Option<Resolution> {
        let columns = ColumnMap::from_headers(&snapshot.headers);
        if columns.is_empty() {
            debug!(headers = ?snapshot.headers, "no progress columns in table");
            return None;
        }

        if let Some(percent) = quantity_percent(snapshot, &columns) {
            return Some(Resolution::new(percent, ProgressSource::Quantities));
        }
        if let Some(percent) = progress_column_mean(snapshot, &columns) {
            return Some(Resolution::new(percent, ProgressSource::ProgressColumn));
        }
        if let Some(percent) = hours_percent(snapshot, &columns) {
            return Some(Resolution::new(percent, ProgressSource::Hours));
        }
        None
    }
}

/// Cached value if it reads as a number, else the default.
pub fn fallback(cached: Option<&str>, default: f64) -> Resolution {
    match cached.and_then(percent_value) {
        Some(percent) => {
            debug!(percent, "using cached progress");
            Resolution::new(percent, ProgressSource::Cached)
        }
        None => {
            if let Some(raw) = cached {
                debug!(raw, "cached progress is not a number");
            }
            debug!(default, "using default progress");
            Resolution::defaulted(default)
        }
    }
}

fn cell_number(snapshot: &TableSnapshot, row: usize, column: usize) -> f64 {
    snapshot
        .cell(row, column)
        .and_then(leading_number)
        .unwrap_or(0.0)
}

/// Summed quantities over every row; missing or unreadable cells add zero.
pub fn sum_quantities(snapshot: &TableSnapshot, budgeted: usize, earned: usize) -> QuantityPair {
    (0..snapshot.row_count())
        .map(|row| {
            QuantityPair::new(
                cell_number(snapshot, row, budgeted),
                cell_number(snapshot, row, earned),
            )
        })
        .sum()
}

/// Summed hours over every row; missing or unreadable cells add zero.
pub fn sum_hours(snapshot: &TableSnapshot, budgeted: usize, earned: usize) -> HoursPair {
    (0..snapshot.row_count())
        .map(|row| {
            HoursPair::new(
                cell_number(snapshot, row, budgeted),
                cell_number(snapshot, row, earned),
            )
        })
        .sum()
}

fn quantity_percent(snapshot: &TableSnapshot, columns: &ColumnMap) -> Option<f64> {
    let (budgeted, earned) = columns.quantities()?;
    let totals = sum_quantities(snapshot, budgeted, earned);
    debug!(budgeted = totals.budgeted, earned = totals.earned, "quantity totals");
    totals.percent()
}

fn progress_column_mean(snapshot: &TableSnapshot, columns: &ColumnMap) -> Option<f64> {
    let column = columns.progress?;
    let (sum, count) = snapshot
        .column(column)
        .map(|cell| percent_value(cell).unwrap_or(0.0))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    debug!(column, rows = count, "progress column");
    (count > 0).then(|| sum / count as f64)
}

fn hours_percent(snapshot: &TableSnapshot, columns: &ColumnMap) -> Option<f64> {
    let (budgeted, earned) = columns.hours()?;
    let totals = sum_hours(snapshot, budgeted, earned);
    debug!(budgeted = totals.budgeted, earned = totals.earned, "hours totals");
    totals.percent()
}
