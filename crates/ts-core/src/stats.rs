//! Aggregate statistics over a window of runs.
//!
//! Builds on [`StatusTotals`] with the figures a status dashboard shows:
//! percent open, per-state durations, who changed the status most and what
//! words show up most in status messages.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::runs::Run;
use crate::totals::{StatusTotals, aggregate};
use crate::tree_state::TreeState;

/// Splits messages into words.
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Words too common in status messages to say anything.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has", "have",
    "i", "if", "in", "is", "it", "its", "me", "my", "no", "not", "of", "on", "or", "so", "that",
    "the", "this", "to", "tree", "was", "we", "will", "with", "you",
];

/// Configuration for aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Length of the top contributor and top keyword lists.
    /// Default: 10.
    pub top_n: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

/// A key and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub key: String,
    pub count: usize,
}

/// Number of runs per state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub open: usize,
    pub closed: usize,
    pub maintenance: usize,
    pub unknown: usize,
}

impl RunCounts {
    const fn bump(&mut self, state: TreeState) {
        match state {
            TreeState::Open => self.open += 1,
            TreeState::Closed => self.closed += 1,
            TreeState::Maintenance => self.maintenance += 1,
            TreeState::Unknown => self.unknown += 1,
        }
    }
}

/// The single longest stretch the tree spent closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestClosure {
    pub author: String,
    pub message: String,
    pub start_time: i64,
    pub duration_ms: i64,
    pub duration_text: String,
}

/// Statistics for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusStats {
    pub totals: StatusTotals,
    /// Percent of known time open, or `"N/A"` when nothing is known.
    pub percent_open_text: String,
    pub open_text: String,
    pub closed_text: String,
    pub maintenance_text: String,
    pub unknown_text: String,
    pub run_counts: RunCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_closure: Option<LongestClosure>,
    pub top_contributors: Vec<Ranked>,
    pub top_keywords: Vec<Ranked>,
}

/// Computes statistics for a reconstructed window.
pub fn compute_stats(runs: &[Run], config: &StatsConfig) -> StatusStats {
    let totals = aggregate(runs);

    let mut run_counts = RunCounts::default();
    for run in runs {
        run_counts.bump(run.state());
    }

    let longest_closure = runs
        .iter()
        .filter(|run| run.state().is_closed())
        // Ties go to the most recent closure, which comes first.
        .rev()
        .max_by_key(|run| run.duration)
        .map(|run| LongestClosure {
            author: run.event.author.clone(),
            message: run.event.message.clone(),
            start_time: run.start_time,
            duration_ms: run.duration,
            duration_text: format_duration(run.duration),
        });

    StatusStats {
        totals,
        percent_open_text: format_percent(totals.percent_open()),
        open_text: format_duration(totals.open()),
        closed_text: format_duration(totals.closed()),
        maintenance_text: format_duration(totals.closed_for_maintenance()),
        unknown_text: format_duration(totals.unknown()),
        run_counts,
        longest_closure,
        top_contributors: top_contributors(runs, config.top_n),
        top_keywords: top_keywords(runs, config.top_n),
    }
}

/// Authors who set the status most often, synthetic entries excluded.
pub fn top_contributors(runs: &[Run], n: usize) -> Vec<Ranked> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for run in runs.iter().filter(|run| !run.event.is_synthetic()) {
        *counts.entry(run.event.author.as_str()).or_default() += 1;
    }
    rank(counts, n)
}

/// Words used most often in status messages, synthetic entries excluded.
pub fn top_keywords(runs: &[Run], n: usize) -> Vec<Ranked> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let messages: Vec<String> = runs
        .iter()
        .filter(|run| !run.event.is_synthetic())
        .map(|run| run.event.message.to_lowercase())
        .collect();

    for message in &messages {
        for word in NON_WORD_RE.split(message) {
            if is_keyword(word) {
                *counts.entry(word).or_default() += 1;
            }
        }
    }
    rank(counts, n)
}

fn is_keyword(word: &str) -> bool {
    !word.is_empty()
        && !word.chars().all(|c| c.is_ascii_digit())
        && !STOP_WORDS.contains(&word)
}

/// Sorts by count descending, then key ascending, and keeps the first `n`.
fn rank(counts: HashMap<&str, usize>, n: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = counts
        .into_iter()
        .map(|(key, count)| Ranked {
            key: key.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(n);
    ranked
}

/// Formats milliseconds for display.
///
/// Under an hour this is whole minutes; otherwise hours with one decimal,
/// or none once past 50 hours.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0) as f64;
    let minutes = (ms / 60_000.0).round();
    if minutes < 60.0 {
        return format!("{} minutes", minutes as i64);
    }
    let hours = ms / 3_600_000.0;
    if hours > 50.0 {
        format!("{hours:.0} hours")
    } else {
        format!("{hours:.1} hours")
    }
}

/// Formats a percentage with one decimal, or `"N/A"`.
pub fn format_percent(percent: Option<f64>) -> String {
    percent.map_or_else(|| "N/A".to_string(), |p| format!("{p:.1}%"))
}
