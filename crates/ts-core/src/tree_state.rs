//! Tree state enum as the single source of truth for state names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the shared repository is accepting commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TreeState {
    Open,
    Closed,
    Maintenance,
    /// Reserved for synthetic filler runs; excluded from known totals.
    Unknown,
}

impl TreeState {
    /// All states, in bucket order.
    pub const ALL: [Self; 4] = [Self::Open, Self::Closed, Self::Maintenance, Self::Unknown];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Maintenance => "maintenance",
            Self::Unknown => "unknown",
        }
    }

    /// Index into a per-state bucket array.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Maintenance => 2,
            Self::Unknown => 3,
        }
    }

    /// Returns true for states that block commits.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed | Self::Maintenance)
    }

    /// Classifies a free-text status message.
    ///
    /// Matching is case-insensitive. A closed message that also mentions
    /// maintenance is `Maintenance`; anything not closed is `Open`.
    pub fn classify_message(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("closed") || message.contains("is close") {
            if message.contains("maintenance") {
                Self::Maintenance
            } else {
                Self::Closed
            }
        } else {
            Self::Open
        }
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TreeState {
    type Err = UnknownTreeState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "maintenance" => Ok(Self::Maintenance),
            "unknown" => Ok(Self::Unknown),
            _ => Err(UnknownTreeState(s.to_string())),
        }
    }
}

impl Serialize for TreeState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TreeState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown tree state names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tree state: {0}")]
pub struct UnknownTreeState(pub String);
