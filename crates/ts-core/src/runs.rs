//! Run reconstruction.
//!
//! Turns a newest-first log of status changes into contiguous runs that
//! exactly tile a query window.
//!
//! # Algorithm Summary
//!
//! 1. Skip entries newer than the window.
//! 2. Each entry's state holds from its own timestamp until the next-newer
//!    entry's timestamp, clipped to the window.
//! 3. The newest entry in the whole log only extends up to "now" when "now"
//!    falls inside the window; the rest of the window is unknown.
//! 4. Gaps at either end of the window are covered by synthetic runs.

use serde::Serialize;
use thiserror::Error;

use crate::clock::Clock;
use crate::entry::Entry;
use crate::tree_state::TreeState;
use crate::types::{TimeRange, ValidationError};

/// Message on the filler run between "now" and the window's newest boundary.
pub const FUTURE_MESSAGE: &str = "Your future is uncertain...";

/// Message on the filler run covering the window older than any entry.
pub const MISSING_DATA_MESSAGE: &str = "Missing data!";

/// Errors from run reconstruction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Entries must be sorted newest-first.
    #[error(
        "entries are not sorted newest-first: entry {index} at {timestamp} is older than entry {} at {next_timestamp}",
        .index + 1
    )]
    UnsortedEntries {
        index: usize,
        timestamp: i64,
        next_timestamp: i64,
    },
}

/// A contiguous interval during which one entry's state held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    /// The entry whose state applies to this interval.
    pub event: Entry,
    /// Most recent point of the interval, in milliseconds.
    pub start_time: i64,
    /// Length of the interval in milliseconds, counting back from `start_time`.
    pub duration: i64,
}

impl Run {
    fn synthetic(message: &str, start_time: i64, end_time: i64) -> Self {
        Self {
            event: Entry::synthetic(end_time, message),
            start_time,
            duration: start_time - end_time,
        }
    }

    /// Oldest point of the interval, in milliseconds.
    pub const fn end_time(&self) -> i64 {
        self.start_time - self.duration
    }

    /// State of the run's entry.
    pub fn state(&self) -> TreeState {
        self.event.state()
    }
}

fn check_sorted(entries: &[Entry]) -> Result<(), ReconstructError> {
    match entries
        .windows(2)
        .position(|pair| pair[0].timestamp < pair[1].timestamp)
    {
        Some(index) => Err(ReconstructError::UnsortedEntries {
            index,
            timestamp: entries[index].timestamp,
            next_timestamp: entries[index + 1].timestamp,
        }),
        None => Ok(()),
    }
}

/// Reconstruct the runs covering `range`.
///
/// `entries` must be sorted newest-first. The returned runs are newest-first,
/// contiguous, non-overlapping and cover `range` exactly. Empty input yields
/// a single synthetic run over the whole window.
///
/// # Arguments
///
/// * `entries` - Status log, newest entry first
/// * `range` - Window to cover
/// * `clock` - Source of "now", consulted only when the newest entry in the
///   log is relevant to the window
pub fn reconstruct_runs<C: Clock>(
    entries: &[Entry],
    range: &TimeRange,
    clock: C,
) -> Result<Vec<Run>, ReconstructError> {
    check_sorted(entries)?;

    let mut runs = Vec::new();
    // Newest instant not yet covered by a run.
    let mut cursor = range.start_time();
    let mut seen_relevant = false;

    for (i, entry) in entries.iter().enumerate() {
        if entry.timestamp > range.start_time() {
            tracing::trace!(timestamp = entry.timestamp, "skipping entry newer than window");
            continue;
        }

        let run_end = entry.timestamp.max(range.end_time());
        let newest = if i == 0 {
            // Nothing is known past the newest entry, so don't claim the
            // future part of the window.
            let now = clock.now_ms();
            if range.contains(now) {
                now
            } else {
                range.start_time()
            }
        } else {
            entries[i - 1].timestamp.min(range.start_time())
        };
        let run_start = newest.max(run_end);

        if !seen_relevant {
            seen_relevant = true;
            if run_start < cursor {
                runs.push(Run::synthetic(FUTURE_MESSAGE, cursor, run_start));
            }
        }

        if run_start > run_end {
            runs.push(Run {
                event: entry.clone(),
                start_time: run_start,
                duration: run_start - run_end,
            });
        }
        cursor = run_end;

        if run_end == range.end_time() {
            break;
        }
    }

    if cursor > range.end_time() {
        runs.push(Run::synthetic(
            MISSING_DATA_MESSAGE,
            cursor,
            range.end_time(),
        ));
    }

    tracing::debug!(
        entries = entries.len(),
        runs = runs.len(),
        start_time = range.start_time(),
        end_time = range.end_time(),
        "reconstructed runs"
    );

    Ok(runs)
}
