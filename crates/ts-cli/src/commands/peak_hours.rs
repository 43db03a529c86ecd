//! Peak-hours command: percent open during the local peak band, per day
//! and time zone.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use ts_core::{Clock, Entry, PeakHourReport, TimeRange, peak_hour_report};

use super::util::{clock_now, format_timestamp, resolve_window};
use crate::Config;
use crate::cli::WindowArgs;

const DATE_WIDTH: usize = 10;
const MIN_CELL_WIDTH: usize = 7;

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct PeakHoursOutput<'a> {
    pub range: TimeRange,
    #[serde(flatten)]
    pub report: &'a PeakHourReport,
}

fn push_row(output: &mut String, label: &str, cells: &[String], width: usize) {
    let mut line = format!("{label:<DATE_WIDTH$}");
    for cell in cells {
        write!(line, "  {cell:>width$}").unwrap();
    }
    writeln!(output, "{}", line.trim_end()).unwrap();
}

/// Formats the report as a table with one row per day, newest first.
///
/// Incomplete cells carry a `*` and are left out of the average row.
pub fn format_peak_hours(range: &TimeRange, report: &PeakHourReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "PEAK HOURS ({:02}:00-{:02}:00 local): {} to {}",
        report.band_start_hour,
        report.band_end_hour,
        format_timestamp(range.end_time()),
        format_timestamp(range.start_time())
    )
    .unwrap();
    writeln!(output).unwrap();

    // Trailing marker column: "*" for incomplete cells, a space otherwise.
    let width = report
        .summaries
        .iter()
        .map(|s| s.zone.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_CELL_WIDTH)
        + 1;

    let header: Vec<String> = report.summaries.iter().map(|s| format!("{} ", s.zone)).collect();
    push_row(&mut output, "DATE", &header, width);

    for day in &report.days {
        let cells: Vec<String> = day
            .cells
            .iter()
            .map(|cell| {
                let marker = if cell.incomplete { '*' } else { ' ' };
                format!("{}{marker}", cell.percent_open_text)
            })
            .collect();
        push_row(&mut output, &day.date.to_string(), &cells, width);
    }

    let averages: Vec<String> = report
        .summaries
        .iter()
        .map(|s| format!("{} ", s.average_percent_open_text))
        .collect();
    push_row(&mut output, "AVERAGE", &averages, width);

    writeln!(output).unwrap();
    writeln!(output, "* band not fully covered by the log, left out of AVERAGE").unwrap();

    output
}

/// Runs the peak-hours command.
pub fn run<W: Write, C: Clock>(
    writer: &mut W,
    entries: &[Entry],
    window: &WindowArgs,
    config: &Config,
    json: bool,
    clock: &C,
) -> Result<()> {
    let range = resolve_window(window, config.default_days, clock_now(clock)?)?;
    let report = peak_hour_report(entries, &range, &config.peak_hours, clock)
        .context("failed to build peak-hour report")?;

    if json {
        let output = PeakHoursOutput {
            range,
            report: &report,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(writer, "{}", format_peak_hours(&range, &report))?;
    }

    Ok(())
}
