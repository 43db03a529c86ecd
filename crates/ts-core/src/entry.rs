//! Raw tree-status change events.

use serde::{Deserialize, Serialize};

use crate::tree_state::TreeState;

/// Author recorded on synthetic filler entries.
pub const ORACLE: &str = "oracle";

/// A single timestamped tree-status change.
///
/// Entries are read-only input; the only entries created here are the
/// synthetic filler entries authored by [`ORACLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// When the status was set, in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Who set the status.
    pub author: String,
    /// Free-text status message.
    pub message: String,
}

impl Entry {
    pub fn new(timestamp: i64, author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            author: author.into(),
            message: message.into(),
        }
    }

    /// Creates a synthetic filler entry.
    pub fn synthetic(timestamp: i64, message: impl Into<String>) -> Self {
        Self::new(timestamp, ORACLE, message)
    }

    /// Returns true if this entry was made up to cover a gap in the log.
    pub fn is_synthetic(&self) -> bool {
        self.author == ORACLE
    }

    /// Derives the tree state this entry reports.
    pub fn state(&self) -> TreeState {
        if self.is_synthetic() {
            TreeState::Unknown
        } else {
            TreeState::classify_message(&self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_entries_are_unknown() {
        let entry = Entry::synthetic(0, "Tree is closed");
        assert!(entry.is_synthetic());
        assert_eq!(entry.state(), TreeState::Unknown);
    }

    #[test]
    fn real_entries_classify_message() {
        let entry = Entry::new(0, "sheriff@example.com", "Tree is closed (bot failure)");
        assert!(!entry.is_synthetic());
        assert_eq!(entry.state(), TreeState::Closed);
    }
}
