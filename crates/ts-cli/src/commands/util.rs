//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use ts_core::{Clock, TimeRange};

use crate::cli::WindowArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative to `now`: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Current time according to `clock`.
pub fn clock_now<C: Clock>(clock: &C) -> anyhow::Result<DateTime<Utc>> {
    let now_ms = clock.now_ms();
    DateTime::from_timestamp_millis(now_ms).with_context(|| format!("clock returned {now_ms}"))
}

/// Resolves window flags into a query range.
///
/// `--until` defaults to now; `--since` defaults to `--days` (or
/// `default_days`) before `--until`.
pub fn resolve_window(
    args: &WindowArgs,
    default_days: u32,
    now: DateTime<Utc>,
) -> anyhow::Result<TimeRange> {
    let until = match &args.until {
        Some(s) => parse_datetime(s, now)?,
        None => now,
    };
    let Some(since) = &args.since else {
        let days = args.days.unwrap_or(default_days);
        return TimeRange::last_days(until, days)
            .with_context(|| format!("--days {days} reaches past the earliest supported date"));
    };
    let since = parse_datetime(since, now)?;

    TimeRange::between(until, since).context("--since must not be later than --until")
}

/// Formats a millisecond timestamp as a UTC minute.
pub fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || format!("@{ms}ms"),
        |dt| dt.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ts_core::FixedClock;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn window(since: Option<&str>, until: Option<&str>, days: Option<u32>) -> WindowArgs {
        WindowArgs {
            since: since.map(String::from),
            until: until.map(String::from),
            days,
        }
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2025-01-15T10:30:00Z", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn parses_relative_time() {
        let dt = parse_datetime("2 days ago", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap());

        let dt = parse_datetime("1 week ago", now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_datetime("yesterday-ish", now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));
    }

    #[test]
    fn rejects_huge_relative_values() {
        assert!(parse_datetime("99999999999 weeks ago", now()).is_err());
    }

    #[test]
    fn default_window_uses_default_days() {
        let range = resolve_window(&window(None, None, None), 7, now()).unwrap();
        assert_eq!(range.start_time(), now().timestamp_millis());
        assert_eq!(range.span_ms(), 7 * 24 * 3_600_000);
    }

    #[test]
    fn days_flag_counts_back_from_until() {
        let range =
            resolve_window(&window(None, Some("2025-03-01T00:00:00Z"), Some(1)), 7, now()).unwrap();
        assert_eq!(
            range.end_time(),
            Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0)
                .unwrap()
                .timestamp_millis()
        );
    }

    #[test]
    fn huge_days_flag_rejected() {
        let err = resolve_window(&window(None, None, Some(u32::MAX)), 7, now()).unwrap_err();
        assert!(err.to_string().contains("--days 4294967295"));
    }

    #[test]
    fn since_after_until_rejected() {
        let err = resolve_window(
            &window(Some("1 hour ago"), Some("2 hours ago"), None),
            7,
            now(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--since"));
    }

    #[test]
    fn clock_now_reads_clock() {
        let clock = FixedClock::at(now());
        assert_eq!(clock_now(&clock).unwrap(), now());
    }

    #[test]
    fn formats_timestamps_in_utc() {
        assert_eq!(
            format_timestamp(now().timestamp_millis()),
            "2025-03-10 12:00 UTC"
        );
    }
}
