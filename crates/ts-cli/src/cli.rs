//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tree-status statistics.
///
/// Reconstructs how long the tree spent open, closed and closed for
/// maintenance from an exported status log.
#[derive(Debug, Parser)]
#[command(name = "tree-stats", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the runs reconstructed for a window.
    Runs {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Show open/closed totals, top contributors and top keywords.
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Length of the top contributor and keyword lists.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show percent open during peak hours per day and time zone.
    PeakHours {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        window: WindowArgs,
    },
}

/// Where to read the status log from and how to print results.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Status log exported as a JSON array. Falls back to `log_path` in config.
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Query window selection.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Oldest instant of the window (ISO 8601 or e.g. "3 days ago").
    #[arg(long)]
    pub since: Option<String>,

    /// Newest instant of the window (ISO 8601 or e.g. "1 hour ago"). Defaults to now.
    #[arg(long)]
    pub until: Option<String>,

    /// Window length in days, counted back from `--until`. Ignored with `--since`.
    #[arg(long)]
    pub days: Option<u32>,
}
