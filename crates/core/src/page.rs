//! Page model - the three progress pages and their metric cards.

use serde::{Deserialize, Serialize};

use crate::cell::{float_prefix, percent_value};
use crate::progress::HoursPair;
use crate::table::TableKind;

/// A page that shows overall progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Landing page with recent work items
    Dashboard,
    /// A project with its sub jobs
    ProjectOverview,
    /// A sub job with its work items
    SubJobOverview,
}

impl PageKind {
    /// The table the page's progress is read from.
    pub fn table_kind(&self) -> TableKind {
        match self {
            PageKind::Dashboard | PageKind::SubJobOverview => TableKind::WorkItems,
            PageKind::ProjectOverview => TableKind::SubJobs,
        }
    }

    /// Fallback percentage shown when nothing can be resolved.
    pub fn default_percent(&self) -> f64 {
        match self {
            PageKind::Dashboard => 0.0,
            PageKind::ProjectOverview => 48.0,
            PageKind::SubJobOverview => 32.0,
        }
    }

    /// Short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Dashboard => "dashboard",
            PageKind::ProjectOverview => "project",
            PageKind::SubJobOverview => "sub-job",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageKind {
    type Err = crate::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "index" => Ok(PageKind::Dashboard),
            "project" | "project-overview" => Ok(PageKind::ProjectOverview),
            "sub-job" | "sub_job" | "subjob" | "sub-job-overview" => Ok(PageKind::SubJobOverview),
            other => Err(crate::ModelError::UnknownPage(other.to_string())),
        }
    }
}

/// Title/value pairs of the metric cards on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricCards {
    /// Cards in page order as (title, value text)
    pub cards: Vec<(String, String)>,
}

impl MetricCards {
    /// Add a card.
    pub fn push(&mut self, title: impl Into<String>, value: impl Into<String>) {
        self.cards.push((title.into(), value.into()));
    }

    /// Value text of the first card whose title contains `needle` (case-insensitive).
    pub fn value_of(&self, needle: &str) -> Option<&str> {
        let needle = needle.to_lowercase();
        self.cards
            .iter()
            .find(|(title, _)| title.to_lowercase().contains(&needle))
            .map(|(_, value)| value.as_str())
    }

    /// The "Overall Progress" card as a number.
    pub fn overall_progress(&self) -> Option<f64> {
        self.value_of("overall progress").and_then(percent_value)
    }

    /// The "Budgeted Hours" and "Earned Hours" cards, when both are shown.
    /// An unreadable value counts as zero.
    pub fn hours(&self) -> Option<HoursPair> {
        let budgeted = self.value_of("budgeted hours")?;
        let earned = self.value_of("earned hours")?;
        Some(HoursPair::new(
            float_prefix(budgeted).unwrap_or(0.0),
            float_prefix(earned).unwrap_or(0.0),
        ))
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when the page has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
