//! Runs command: lists the reconstructed runs for a window.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use ts_core::{Clock, Entry, Run, TimeRange, format_duration, reconstruct_runs};

use super::util::{clock_now, format_timestamp, resolve_window};
use crate::Config;
use crate::cli::WindowArgs;

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct RunsReport<'a> {
    pub range: TimeRange,
    pub runs: &'a [Run],
}

/// Formats runs as one line each, newest first.
pub fn format_runs(range: &TimeRange, runs: &[Run]) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "RUNS: {} to {}",
        format_timestamp(range.end_time()),
        format_timestamp(range.start_time())
    )
    .unwrap();
    writeln!(output).unwrap();

    if runs.is_empty() {
        writeln!(output, "(empty window)").unwrap();
        return output;
    }

    for run in runs {
        writeln!(
            output,
            "{}  {:<11}  {:>10}  {}: {}",
            format_timestamp(run.end_time()),
            run.state().as_str(),
            format_duration(run.duration),
            run.event.author,
            run.event.message
        )
        .unwrap();
    }

    output
}

/// Runs the runs command.
pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    entries: &[Entry],
    window: &WindowArgs,
    config: &Config,
    json: bool,
    clock: &C,
) -> Result<()> {
    let range = resolve_window(window, config.default_days, clock_now(clock)?)?;
    let runs = reconstruct_runs(entries, &range, clock)?;

    if json {
        let report = RunsReport { range, runs: &runs };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_runs(&range, &runs))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use ts_core::FixedClock;

    fn ms(h: u32) -> i64 {
        Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new(ms(20), "alice", "Tree is open"),
            Entry::new(ms(14), "bob", "Tree is closed (compile failure)"),
        ]
    }

    fn window() -> WindowArgs {
        WindowArgs {
            since: Some("2025-03-10T12:00:00Z".to_string()),
            until: Some("2025-03-10T23:00:00Z".to_string()),
            days: None,
        }
    }

    #[test]
    fn test_runs_text_output() {
        let clock = FixedClock(ms(23) + 3_600_000);
        let mut output = Vec::new();
        run(&mut output, &entries(), &window(), &Config::default(), false, &clock).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        RUNS: 2025-03-10 12:00 UTC to 2025-03-10 23:00 UTC

        2025-03-10 20:00 UTC  open          3.0 hours  alice: Tree is open
        2025-03-10 14:00 UTC  closed        6.0 hours  bob: Tree is closed (compile failure)
        2025-03-10 12:00 UTC  unknown       2.0 hours  oracle: Missing data!
        ");
    }

    #[test]
    fn test_runs_json_output() {
        let clock = FixedClock(ms(23) + 3_600_000);
        let mut output = Vec::new();
        run(&mut output, &entries(), &window(), &Config::default(), true, &clock).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["range"]["start_time"], ms(23));
        assert_eq!(value["range"]["end_time"], ms(12));
        assert_eq!(value["runs"].as_array().unwrap().len(), 3);
        assert_eq!(value["runs"][0]["event"]["author"], "alice");
        assert_eq!(value["runs"][0]["duration"], 3 * 3_600_000);
    }

    #[test]
    fn test_runs_truncated_at_now() {
        let clock = FixedClock(ms(22));
        let mut output = Vec::new();
        run(&mut output, &entries(), &window(), &Config::default(), false, &clock).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("oracle: Your future is uncertain..."));
    }

    #[test]
    fn test_empty_window() {
        let range = TimeRange::new(ms(1), ms(1)).unwrap();
        assert!(format_runs(&range, &[]).contains("(empty window)"));
    }
}
