//! Per-state duration totals.

use serde::{Serialize, Serializer};

use crate::runs::Run;
use crate::tree_state::{TreeState, UnknownTreeState};

/// Accumulated time per tree state, in milliseconds.
///
/// Buckets are fixed to [`TreeState`]; string keys go through
/// [`StatusTotals::increment_named`] and fail on names that aren't states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTotals {
    buckets: [i64; 4],
}

#[derive(Serialize)]
struct TotalsView {
    open_ms: i64,
    closed_ms: i64,
    maintenance_ms: i64,
    unknown_ms: i64,
    total_known_ms: i64,
    total_ms: i64,
}

impl Serialize for StatusTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TotalsView {
            open_ms: self.open(),
            closed_ms: self.closed(),
            maintenance_ms: self.closed_for_maintenance(),
            unknown_ms: self.unknown(),
            total_known_ms: self.total_known(),
            total_ms: self.total(),
        }
        .serialize(serializer)
    }
}

impl StatusTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `duration_ms` to the bucket for `state`.
    pub const fn increment(&mut self, state: TreeState, duration_ms: i64) {
        self.buckets[state.index()] += duration_ms;
    }

    /// Adds `duration_ms` to the bucket named `state`.
    pub fn increment_named(&mut self, state: &str, duration_ms: i64) -> Result<(), UnknownTreeState> {
        let state: TreeState = state.parse()?;
        self.increment(state, duration_ms);
        Ok(())
    }

    pub const fn get(&self, state: TreeState) -> i64 {
        self.buckets[state.index()]
    }

    pub const fn open(&self) -> i64 {
        self.get(TreeState::Open)
    }

    /// Time closed for any reason, maintenance included.
    pub const fn closed(&self) -> i64 {
        self.get(TreeState::Closed) + self.get(TreeState::Maintenance)
    }

    pub const fn closed_for_maintenance(&self) -> i64 {
        self.get(TreeState::Maintenance)
    }

    pub const fn unknown(&self) -> i64 {
        self.get(TreeState::Unknown)
    }

    pub const fn total(&self) -> i64 {
        self.buckets[0] + self.buckets[1] + self.buckets[2] + self.buckets[3]
    }

    pub const fn total_known(&self) -> i64 {
        self.total() - self.unknown()
    }

    /// Share of known time the tree was open, in percent.
    ///
    /// Returns `None` when no known time has been recorded.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_open(&self) -> Option<f64> {
        let known = self.total_known();
        if known == 0 {
            return None;
        }
        Some(self.open() as f64 / known as f64 * 100.0)
    }
}

/// Sums run durations per state.
pub fn aggregate(runs: &[Run]) -> StatusTotals {
    let mut totals = StatusTotals::new();
    for run in runs {
        totals.increment(run.state(), run.duration);
    }
    totals
}
