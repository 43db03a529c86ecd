//! CLI subcommand implementations.

pub mod peak_hours;
pub mod runs;
pub mod stats;
pub mod util;
