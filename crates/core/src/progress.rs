//! Progress model - budgeted/earned totals and resolved percentages.

use serde::{Deserialize, Serialize};

/// Budgeted and earned quantity, per row or summed across rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityPair {
    /// Planned quantity
    pub budgeted: f64,

    /// Quantity credited as complete
    pub earned: f64,
}

/// Budgeted and earned man-hours, per row or summed across rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoursPair {
    /// Planned hours
    pub budgeted: f64,

    /// Hours credited as complete
    pub earned: f64,
}

macro_rules! earned_ratio {
    ($ty:ident) => {
        impl $ty {
            /// Create a pair.
            pub fn new(budgeted: f64, earned: f64) -> Self {
                Self { budgeted, earned }
            }

            /// Earned over budgeted as a percentage; `None` unless budgeted is positive.
            ///
            /// The ratio is not clamped, so over-earned work reads above 100.
            pub fn percent(&self) -> Option<f64> {
                (self.budgeted > 0.0).then(|| self.earned / self.budgeted * 100.0)
            }
        }

        impl std::ops::Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self {
                    budgeted: self.budgeted + rhs.budgeted,
                    earned: self.earned + rhs.earned,
                }
            }
        }

        impl std::iter::Sum for $ty {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, pair| acc + pair)
            }
        }
    };
}

earned_ratio!(QuantityPair);
earned_ratio!(HoursPair);

/// Which tier of the resolution chain produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressSource {
    /// Earned over budgeted quantity
    Quantities,
    /// Mean of a progress column
    ProgressColumn,
    /// Earned over budgeted hours
    Hours,
    /// Earned over budgeted hours shown on the page's metric cards
    HoursCards,
    /// A value carried over from another page or call
    Cached,
    /// The caller's default
    Default,
}

impl ProgressSource {
    /// Whether the value was computed from the current data.
    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            ProgressSource::Quantities
                | ProgressSource::ProgressColumn
                | ProgressSource::Hours
                | ProgressSource::HoursCards
        )
    }

    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressSource::Quantities => "quantities",
            ProgressSource::ProgressColumn => "progress-column",
            ProgressSource::Hours => "hours",
            ProgressSource::HoursCards => "hours-cards",
            ProgressSource::Cached => "cached",
            ProgressSource::Default => "default",
        }
    }
}

impl std::fmt::Display for ProgressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved completion percentage and the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Completion percentage
    pub percent: f64,

    /// Tier that produced the value
    pub source: ProgressSource,
}

impl Resolution {
    /// A value computed or looked up by the given tier.
    pub fn new(percent: f64, source: ProgressSource) -> Self {
        Self { percent, source }
    }

    /// The caller's default.
    pub fn defaulted(percent: f64) -> Self {
        Self::new(percent, ProgressSource::Default)
    }

    /// Whether the value came from the data rather than a fallback.
    pub fn is_computed(&self) -> bool {
        self.source.is_computed()
    }

    /// Percentage rounded half away from zero, as shown to users.
    pub fn rounded(&self) -> i64 {
        self.percent.round() as i64
    }

    /// Display text such as `"33%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.rounded())
    }
}
