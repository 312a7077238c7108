//! Progress resolution.
//!
//! Turns rendered tables or typed records into one completion percentage,
//! degrading through fixed tiers instead of failing.

#![warn(missing_docs)]

pub mod columns;
pub mod resolver;
pub mod typed;

pub use columns::ColumnMap;
pub use resolver::{fallback, sum_hours, sum_quantities, ProgressResolver};
pub use typed::{overall_hours_percent, resolve_sub_jobs, resolve_work_items};
