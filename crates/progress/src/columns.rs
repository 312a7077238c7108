//! Header matching - which column holds which figure.

use serde::{Deserialize, Serialize};

use evtrack_core::normalize_header;

/// Header fragment for budgeted quantity.
pub const BUDGETED_QUANTITY: &str = "budgeted quantity";
/// Header fragment for earned quantity.
pub const EARNED_QUANTITY: &str = "earned quantity";
/// Header fragment for a percent-complete column.
pub const PROGRESS: &str = "progress";
/// Header fragment for budgeted man-hours.
pub const BUDGETED_HOURS: &str = "budgeted hours";
/// Header fragment for earned man-hours.
pub const EARNED_HOURS: &str = "earned hours";

/// Column indices resolved from a table's headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Budgeted quantity column
    pub budgeted_quantity: Option<usize>,

    /// Earned quantity column
    pub earned_quantity: Option<usize>,

    /// Progress column
    pub progress: Option<usize>,

    /// Budgeted hours column
    pub budgeted_hours: Option<usize>,

    /// Earned hours column
    pub earned_hours: Option<usize>,
}

impl ColumnMap {
    /// Match headers by case-insensitive substring. The first matching header
    /// wins for each figure; one header may fill several figures.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let header = normalize_header(header.as_ref());
            let claim = |slot: &mut Option<usize>, needle: &str| {
                if slot.is_none() && header.contains(needle) {
                    *slot = Some(idx);
                }
            };
            claim(&mut map.budgeted_quantity, BUDGETED_QUANTITY);
            claim(&mut map.earned_quantity, EARNED_QUANTITY);
            claim(&mut map.progress, PROGRESS);
            claim(&mut map.budgeted_hours, BUDGETED_HOURS);
            claim(&mut map.earned_hours, EARNED_HOURS);
        }
        map
    }

    /// Both quantity columns, if present.
    pub fn quantities(&self) -> Option<(usize, usize)> {
        Some((self.budgeted_quantity?, self.earned_quantity?))
    }

    /// Both hours columns, if present.
    pub fn hours(&self) -> Option<(usize, usize)> {
        Some((self.budgeted_hours?, self.earned_hours?))
    }

    /// Whether no figure was found.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
