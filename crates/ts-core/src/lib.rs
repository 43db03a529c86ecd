//! Core domain logic for tree-status statistics.
//!
//! This crate contains the fundamental types and logic for:
//! - Run reconstruction: tiling a query window with the states a status log reports
//! - Aggregation: per-state duration totals over a set of runs
//! - Reports: percent open, top contributors and keywords, peak-hour breakdowns

mod clock;
mod entry;
pub mod peak_hours;
mod runs;
pub mod stats;
mod totals;
mod tree_state;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{Entry, ORACLE};
pub use peak_hours::{PeakHourReport, PeakHoursConfig, ZoneOffset, peak_hour_report};
pub use runs::{FUTURE_MESSAGE, MISSING_DATA_MESSAGE, ReconstructError, Run, reconstruct_runs};
pub use stats::{
    StatsConfig, StatusStats, compute_stats, format_duration, format_percent, top_contributors,
    top_keywords,
};
pub use totals::{StatusTotals, aggregate};
pub use tree_state::{TreeState, UnknownTreeState};
pub use types::{TimeRange, ValidationError};
