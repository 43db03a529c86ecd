//! Peak-hour open percentages across time zones.
//!
//! For every day a query window touches and every configured zone, the
//! local peak band (by default 17:00 to 09:00 the next morning) is
//! reconstructed on its own and reported as percent open. A band whose known
//! time doesn't add up to its wall-clock length is flagged incomplete.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::entry::Entry;
use crate::runs::{ReconstructError, reconstruct_runs};
use crate::stats::format_percent;
use crate::totals::aggregate;
use crate::types::{TimeRange, ValidationError};

const MIN_OFFSET_HOURS: i32 = -12;
const MAX_OFFSET_HOURS: i32 = 14;

/// A named fixed offset from UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneOffset {
    pub name: String,
    pub offset_hours: i32,
}

impl ZoneOffset {
    pub fn new(name: impl Into<String>, offset_hours: i32) -> Self {
        Self {
            name: name.into(),
            offset_hours,
        }
    }
}

/// Configuration for the peak-hour report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHoursConfig {
    /// Local hour the peak band starts.
    /// Default: 17.
    pub band_start_hour: u32,

    /// Local hour the peak band ends. At or before `band_start_hour` means
    /// the next day.
    /// Default: 9.
    pub band_end_hour: u32,

    /// Zones to report on.
    pub zones: Vec<ZoneOffset>,
}

impl Default for PeakHoursConfig {
    fn default() -> Self {
        Self {
            band_start_hour: 17,
            band_end_hour: 9,
            zones: vec![
                ZoneOffset::new("PST", -8),
                ZoneOffset::new("EST", -5),
                ZoneOffset::new("UTC", 0),
                ZoneOffset::new("CET", 1),
                ZoneOffset::new("JST", 9),
            ],
        }
    }
}

impl PeakHoursConfig {
    /// Checks band hours and zone offsets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for hour in [self.band_start_hour, self.band_end_hour] {
            if hour > 23 {
                return Err(ValidationError::InvalidBandHour { hour });
            }
        }
        for zone in &self.zones {
            if !(MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&zone.offset_hours) {
                return Err(ValidationError::InvalidOffset {
                    name: zone.name.clone(),
                    offset_hours: zone.offset_hours,
                });
            }
        }
        Ok(())
    }

    fn max_abs_offset_hours(&self) -> i64 {
        self.zones
            .iter()
            .map(|zone| i64::from(zone.offset_hours.abs()))
            .max()
            .unwrap_or(0)
    }

    /// The band for `date` in `zone`, as a UTC window.
    fn band_window(&self, date: NaiveDate, zone: &ZoneOffset) -> Result<TimeRange, ValidationError> {
        let local_start = at_hour(date, self.band_start_hour)?;
        let end_date = if self.band_end_hour > self.band_start_hour {
            date
        } else {
            date.succ_opt()
                .ok_or_else(|| ValidationError::TimestampOutOfRange {
                    timestamp: local_start.and_utc().timestamp_millis(),
                })?
        };
        let local_end = at_hour(end_date, self.band_end_hour)?;

        let offset = Duration::hours(i64::from(zone.offset_hours));
        let start_ms = (local_start - offset).and_utc().timestamp_millis();
        let end_ms = (local_end - offset).and_utc().timestamp_millis();
        TimeRange::new(end_ms, start_ms)
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> Result<NaiveDateTime, ValidationError> {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .map(|time| date.and_time(time))
        .ok_or(ValidationError::InvalidBandHour { hour })
}

fn date_of(timestamp: i64) -> Result<NaiveDate, ValidationError> {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.date_naive())
        .ok_or(ValidationError::TimestampOutOfRange { timestamp })
}

/// Percent open for one zone's band on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakCell {
    pub zone: String,
    /// The band as a UTC window, newest boundary first.
    pub window: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_open: Option<f64>,
    /// Percent open, or `"N/A"` when nothing is known about the band.
    pub percent_open_text: String,
    /// True when part of the band has no data.
    pub incomplete: bool,
}

/// All zones for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub cells: Vec<PeakCell>,
}

/// Average over the complete bands of one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub complete_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_percent_open: Option<f64>,
    pub average_percent_open_text: String,
}

/// Peak-hour breakdown for a query window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHourReport {
    pub band_start_hour: u32,
    pub band_end_hour: u32,
    /// Newest day first.
    pub days: Vec<PeakDay>,
    /// One per configured zone, in configuration order.
    pub summaries: Vec<ZoneSummary>,
}

/// Builds the peak-hour report for every day `range` touches.
///
/// The range is widened by the largest configured offset so that no zone's
/// local day is missed. `entries` must be sorted newest-first.
pub fn peak_hour_report<C: Clock>(
    entries: &[Entry],
    range: &TimeRange,
    config: &PeakHoursConfig,
    clock: C,
) -> Result<PeakHourReport, ReconstructError> {
    config.validate()?;

    let widen = Duration::hours(config.max_abs_offset_hours()).num_milliseconds();
    let first = date_of(range.end_time().saturating_sub(widen))?;
    let last = date_of(range.start_time().saturating_add(widen))?;

    let mut days = Vec::new();
    for date in first.iter_days().take_while(|date| *date <= last) {
        let mut cells = Vec::with_capacity(config.zones.len());
        for zone in &config.zones {
            cells.push(peak_cell(entries, date, zone, config, &clock)?);
        }
        days.push(PeakDay { date, cells });
    }
    days.reverse();

    let summaries = config
        .zones
        .iter()
        .enumerate()
        .map(|(i, zone)| summarize_zone(&zone.name, days.iter().map(|day| &day.cells[i])))
        .collect();

    tracing::debug!(days = days.len(), zones = config.zones.len(), "built peak-hour report");

    Ok(PeakHourReport {
        band_start_hour: config.band_start_hour,
        band_end_hour: config.band_end_hour,
        days,
        summaries,
    })
}

fn peak_cell<C: Clock>(
    entries: &[Entry],
    date: NaiveDate,
    zone: &ZoneOffset,
    config: &PeakHoursConfig,
    clock: &C,
) -> Result<PeakCell, ReconstructError> {
    let window = config.band_window(date, zone)?;
    let runs = reconstruct_runs(entries, &window, clock)?;
    let totals = aggregate(&runs);

    let incomplete = totals.total_known() != window.span_ms();
    if incomplete {
        tracing::debug!(
            %date,
            zone = %zone.name,
            known_ms = totals.total_known(),
            expected_ms = window.span_ms(),
            "peak band incomplete"
        );
    }

    let percent_open = totals.percent_open();
    Ok(PeakCell {
        zone: zone.name.clone(),
        window,
        percent_open,
        percent_open_text: format_percent(percent_open),
        incomplete,
    })
}

#[allow(clippy::cast_precision_loss)]
fn summarize_zone<'a>(zone: &str, cells: impl Iterator<Item = &'a PeakCell>) -> ZoneSummary {
    let complete: Vec<f64> = cells
        .filter(|cell| !cell.incomplete)
        .filter_map(|cell| cell.percent_open)
        .collect();

    let average_percent_open = if complete.is_empty() {
        None
    } else {
        Some(complete.iter().sum::<f64>() / complete.len() as f64)
    };

    ZoneSummary {
        zone: zone.to_string(),
        complete_days: complete.len(),
        average_percent_open,
        average_percent_open_text: format_percent(average_percent_open),
    }
}
