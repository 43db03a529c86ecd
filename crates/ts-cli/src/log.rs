//! Reading exported status logs.
//!
//! A log is a JSON array of status records. Records carry either a
//! millisecond `timestamp` or a `date` string as the status app exports it
//! (`2025-03-10 17:04:12.123456`, UTC), and `author` or `username`.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use ts_core::Entry;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct LogRecord {
    #[serde(alias = "date")]
    timestamp: RawTimestamp,
    #[serde(alias = "username")]
    author: String,
    #[serde(default)]
    message: String,
}

fn parse_timestamp(raw: &RawTimestamp) -> Result<i64> {
    match raw {
        RawTimestamp::Millis(ms) => Ok(*ms),
        RawTimestamp::Text(text) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Ok(dt.timestamp_millis());
            }
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .map(|dt| dt.and_utc().timestamp_millis())
                .with_context(|| format!("invalid status date: {text}"))
        }
    }
}

/// Parses a status log, returning entries newest-first.
pub fn parse_log(json: &str) -> Result<Vec<Entry>> {
    let records: Vec<LogRecord> = serde_json::from_str(json).context("invalid status log JSON")?;

    let mut entries = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let timestamp = parse_timestamp(&record.timestamp)
                .with_context(|| format!("status record {i}"))?;
            Ok(Entry::new(timestamp, record.author, record.message))
        })
        .collect::<Result<Vec<_>>>()?;

    // Stable, so same-timestamp entries keep their export order.
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(entries)
}

/// Reads and parses a status log file.
pub fn load_log(path: &Path) -> Result<Vec<Entry>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read status log {}", path.display()))?;
    let entries = parse_log(&json).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded status log");
    Ok(entries)
}
