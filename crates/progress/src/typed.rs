//! Progress resolution over typed records.
//!
//! Same tier order as the table resolver, read from structured fields
//! instead of matched headers.

use evtrack_core::{
    HoursPair, ProgressSource, QuantityPair, Resolution, SubJobSummary, WorkItem,
};
use tracing::debug;

use crate::resolver::fallback;

/// Resolve a percentage from work items, always producing a value.
pub fn resolve_work_items(items: &[WorkItem], cached: Option<&str>, default: f64) -> Resolution {
    if items.iter().any(WorkItem::has_quantities) {
        let totals: QuantityPair = items.iter().map(WorkItem::quantities).sum();
        if let Some(percent) = totals.percent() {
            debug!(percent, "work items resolved from quantities");
            return Resolution::new(percent, ProgressSource::Quantities);
        }
    }

    if let Some(percent) = mean(items.iter().filter_map(|item| item.progress)) {
        debug!(percent, "work items resolved from progress");
        return Resolution::new(percent, ProgressSource::ProgressColumn);
    }

    if items.iter().any(WorkItem::has_hours) {
        if let Some(percent) = overall_hours_percent(items) {
            debug!(percent, "work items resolved from hours");
            return Resolution::new(percent, ProgressSource::Hours);
        }
    }

    fallback(cached, default)
}

/// Resolve a percentage from sub jobs by averaging their reported progress.
pub fn resolve_sub_jobs(
    sub_jobs: &[SubJobSummary],
    cached: Option<&str>,
    default: f64,
) -> Resolution {
    match mean(sub_jobs.iter().filter_map(|s| s.progress)) {
        Some(percent) => Resolution::new(percent, ProgressSource::ProgressColumn),
        None => fallback(cached, default),
    }
}

/// Earned over budgeted man-hours across all items, as the dashboard shows it.
pub fn overall_hours_percent(items: &[WorkItem]) -> Option<f64> {
    let totals: HoursPair = items.iter().map(WorkItem::hours).sum();
    totals.percent()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
