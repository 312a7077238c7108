//! Typed work-item and sub-job records, as delivered by the data layer.

use serde::{Deserialize, Serialize};

use crate::id::SubJobId;
use crate::progress::{HoursPair, QuantityPair};

/// A unit of scoped work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Cost code
    #[serde(default)]
    pub code: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Planned quantity
    pub budgeted_quantity: Option<f64>,

    /// Quantity credited as complete
    pub earned_quantity: Option<f64>,

    /// Unit of measure, e.g. "CYD"
    pub unit: Option<String>,

    /// Planned man-hours
    pub budgeted_man_hours: Option<f64>,

    /// Man-hours credited as complete
    pub earned_man_hours: Option<f64>,

    /// Reported percent complete
    pub progress: Option<f64>,
}

impl WorkItem {
    /// Quantities, with absent values counted as zero.
    pub fn quantities(&self) -> QuantityPair {
        QuantityPair::new(
            self.budgeted_quantity.unwrap_or(0.0),
            self.earned_quantity.unwrap_or(0.0),
        )
    }

    /// Man-hours, with absent values counted as zero.
    pub fn hours(&self) -> HoursPair {
        HoursPair::new(
            self.budgeted_man_hours.unwrap_or(0.0),
            self.earned_man_hours.unwrap_or(0.0),
        )
    }

    /// Whether the item carries any quantity figure.
    pub fn has_quantities(&self) -> bool {
        self.budgeted_quantity.is_some() || self.earned_quantity.is_some()
    }

    /// Whether the item carries any hours figure.
    pub fn has_hours(&self) -> bool {
        self.budgeted_man_hours.is_some() || self.earned_man_hours.is_some()
    }
}

/// A sub job and its reported progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubJobSummary {
    /// Identifier
    pub id: SubJobId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Reported percent complete
    pub progress: Option<f64>,
}
