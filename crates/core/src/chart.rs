//! Ring chart input, handed to whatever renders the doughnut.

use serde::{Deserialize, Serialize};

use crate::progress::Resolution;

/// Visual theme of the progress ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Color of the completed segment
    pub complete_color: String,

    /// Color of the remaining segment
    pub remaining_color: String,

    /// Fraction of the radius cut out of the middle
    pub cutout: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            complete_color: "#4CAF50".to_string(),
            remaining_color: "#2c3034".to_string(),
            cutout: 0.75,
        }
    }
}

/// Segments and centered text of a progress ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingChart {
    /// Chart heading
    pub title: String,

    /// Completed share
    pub complete: f64,

    /// Remaining share, never negative
    pub remaining: f64,

    /// Centered percentage text, e.g. "33%"
    pub label: String,

    /// Caption under the percentage
    pub caption: String,

    /// Where the value came from
    pub resolution: Resolution,

    /// Colors and cutout
    pub theme: ChartTheme,
}

impl RingChart {
    /// Build the ring for a resolved percentage.
    pub fn from_resolution(resolution: Resolution) -> Self {
        Self {
            title: "Overall Progress".to_string(),
            complete: resolution.percent,
            remaining: (100.0 - resolution.percent).max(0.0),
            label: resolution.label(),
            caption: "Complete".to_string(),
            resolution,
            theme: ChartTheme::default(),
        }
    }

    /// Use a different theme.
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }
}
