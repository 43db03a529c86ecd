//! Stats command: totals, longest closure and top-N lists for a window.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use ts_core::stats::Ranked;
use ts_core::{Clock, Entry, StatsConfig, StatusStats, TimeRange, compute_stats, reconstruct_runs};

use super::util::{clock_now, format_timestamp, resolve_window};
use crate::Config;
use crate::cli::WindowArgs;

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub range: TimeRange,
    #[serde(flatten)]
    pub stats: &'a StatusStats,
}

fn write_ranked(output: &mut String, title: &str, ranked: &[Ranked]) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();

    if ranked.is_empty() {
        writeln!(output, "  (none)").unwrap();
        return;
    }

    let width = ranked.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
    for entry in ranked {
        writeln!(output, "  {:<width$}  {}", entry.key, entry.count).unwrap();
    }
}

/// Formats the human-readable statistics.
pub fn format_stats(range: &TimeRange, stats: &StatusStats) -> String {
    let mut output = String::new();
    let counts = &stats.run_counts;

    writeln!(
        output,
        "TREE STATUS: {} to {}",
        format_timestamp(range.end_time()),
        format_timestamp(range.start_time())
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Percent open:  {}", stats.percent_open_text).unwrap();
    writeln!(output, "Open:          {} ({} runs)", stats.open_text, counts.open).unwrap();
    writeln!(
        output,
        "Closed:        {} ({} runs)",
        stats.closed_text,
        counts.closed + counts.maintenance
    )
    .unwrap();
    writeln!(
        output,
        "  Maintenance: {} ({} runs)",
        stats.maintenance_text, counts.maintenance
    )
    .unwrap();
    writeln!(output, "Unknown:       {} ({} runs)", stats.unknown_text, counts.unknown).unwrap();

    if let Some(longest) = &stats.longest_closure {
        writeln!(output).unwrap();
        writeln!(
            output,
            "Longest closure: {} by {}, ending {}",
            longest.duration_text,
            longest.author,
            format_timestamp(longest.start_time)
        )
        .unwrap();
        writeln!(output, "  {}", longest.message).unwrap();
    }

    write_ranked(&mut output, "TOP CONTRIBUTORS", &stats.top_contributors);
    write_ranked(&mut output, "TOP KEYWORDS", &stats.top_keywords);

    output
}

/// Runs the stats command.
pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    entries: &[Entry],
    window: &WindowArgs,
    config: &Config,
    top: Option<usize>,
    json: bool,
    clock: &C,
) -> Result<()> {
    let range = resolve_window(window, config.default_days, clock_now(clock)?)?;
    let runs = reconstruct_runs(entries, &range, clock)?;
    let stats_config = StatsConfig {
        top_n: top.unwrap_or(config.top_n),
    };
    let stats = compute_stats(&runs, &stats_config);

    if json {
        let report = StatsReport {
            range,
            stats: &stats,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_stats(&range, &stats))?;
    }

    Ok(())
}
