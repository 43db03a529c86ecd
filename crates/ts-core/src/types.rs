//! Core type definitions with validation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The range runs forwards instead of from newest to oldest.
    #[error("invalid time range: start {start_time} is older than end {end_time}")]
    InvalidRange { start_time: i64, end_time: i64 },

    /// A timestamp chrono can't represent as a date.
    #[error("timestamp {timestamp} is out of range")]
    TimestampOutOfRange { timestamp: i64 },

    /// A time zone offset outside what any real zone uses.
    #[error("time zone {name} has offset {offset_hours}h, expected -12h to +14h")]
    InvalidOffset { name: String, offset_hours: i32 },

    /// A range whose length doesn't fit in an `i64` of milliseconds.
    #[error("time range from {end_time} to {start_time} is too long")]
    RangeTooLong { start_time: i64, end_time: i64 },

    /// A window reaching back further than chrono can represent.
    #[error("a window of {days} days is out of range")]
    WindowTooLong { days: u32 },

    /// A peak band hour outside 0-23.
    #[error("peak band hour must be 0-23, got {hour}")]
    InvalidBandHour { hour: u32 },
}

/// A query window expressed backwards, from the newest instant into the past.
///
/// `start_time` is the most recent boundary and `end_time` the oldest, both
/// in milliseconds since the Unix epoch. `start_time >= end_time` always holds
/// for ranges built through [`TimeRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange", into = "RawTimeRange")]
pub struct TimeRange {
    start_time: i64,
    end_time: i64,
}

#[derive(Serialize, Deserialize)]
struct RawTimeRange {
    start_time: i64,
    end_time: i64,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ValidationError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}

impl From<TimeRange> for RawTimeRange {
    fn from(range: TimeRange) -> Self {
        Self {
            start_time: range.start_time,
            end_time: range.end_time,
        }
    }
}

impl TimeRange {
    /// Creates a range after checking `start_time >= end_time`.
    pub fn new(start_time: i64, end_time: i64) -> Result<Self, ValidationError> {
        if start_time < end_time {
            return Err(ValidationError::InvalidRange {
                start_time,
                end_time,
            });
        }
        // Every span and run duration is derived from this difference.
        if start_time.checked_sub(end_time).is_none() {
            return Err(ValidationError::RangeTooLong {
                start_time,
                end_time,
            });
        }
        Ok(Self {
            start_time,
            end_time,
        })
    }

    /// Creates a range from two instants, newest first.
    pub fn between(newest: DateTime<Utc>, oldest: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::new(newest.timestamp_millis(), oldest.timestamp_millis())
    }

    /// The `days` days leading up to `now`.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Result<Self, ValidationError> {
        let oldest = Duration::try_days(i64::from(days))
            .and_then(|length| now.checked_sub_signed(length))
            .ok_or(ValidationError::WindowTooLong { days })?;
        Self::between(now, oldest)
    }

    /// Most recent boundary, in milliseconds.
    pub const fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Oldest boundary, in milliseconds.
    pub const fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Length of the window in milliseconds.
    pub const fn span_ms(&self) -> i64 {
        self.start_time - self.end_time
    }

    /// Returns true if `timestamp` lies strictly inside the window.
    pub const fn contains(&self, timestamp: i64) -> bool {
        timestamp > self.end_time && timestamp < self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_forward_range() {
        let err = TimeRange::new(0, 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRange {
                start_time: 0,
                end_time: 1
            }
        );
    }

    #[test]
    fn empty_range_is_valid() {
        let range = TimeRange::new(5, 5).unwrap();
        assert_eq!(range.span_ms(), 0);
        assert!(!range.contains(5));
    }

    #[test]
    fn last_days_spans_whole_days() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let range = TimeRange::last_days(now, 7).unwrap();
        assert_eq!(range.start_time(), now.timestamp_millis());
        assert_eq!(range.span_ms(), 7 * 24 * 3_600_000);
    }

    #[test]
    fn last_days_rejects_windows_past_representable_dates() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            TimeRange::last_days(now, u32::MAX),
            Err(ValidationError::WindowTooLong { days: u32::MAX })
        );
        assert_eq!(
            TimeRange::last_days(now, 100_000_000),
            Err(ValidationError::WindowTooLong { days: 100_000_000 })
        );
    }

    #[test]
    fn rejects_range_longer_than_i64_millis() {
        assert_eq!(
            TimeRange::new(i64::MAX, i64::MIN),
            Err(ValidationError::RangeTooLong {
                start_time: i64::MAX,
                end_time: i64::MIN,
            })
        );

        let widest = TimeRange::new(i64::MAX, 0).unwrap();
        assert_eq!(widest.span_ms(), i64::MAX);
    }

    #[test]
    fn deserialize_validates_order() {
        let ok: TimeRange =
            serde_json::from_str(r#"{"start_time": 2000, "end_time": 1000}"#).unwrap();
        assert_eq!(ok.span_ms(), 1000);

        let bad: Result<TimeRange, _> =
            serde_json::from_str(r#"{"start_time": 1000, "end_time": 2000}"#);
        assert!(bad.is_err());
    }
}
