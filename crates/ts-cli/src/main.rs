use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ts_cli::commands::{peak_hours, runs, stats};
use ts_cli::{Cli, Commands, Config, SourceArgs, log};
use ts_core::{Entry, SystemClock};

/// Load config and the status log it or `--log` points at.
fn load_entries(config_path: Option<&Path>, source: &SourceArgs) -> Result<(Vec<Entry>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path = config.log_path(source.log.as_deref())?;
    let entries = log::load_log(&path)?;
    Ok((entries, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let clock = SystemClock;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Runs { source, window }) => {
            let (entries, config) = load_entries(cli.config.as_deref(), source)?;
            runs::run(&mut out, &entries, window, &config, source.json, &clock)?;
        }
        Some(Commands::Stats {
            source,
            window,
            top,
        }) => {
            let (entries, config) = load_entries(cli.config.as_deref(), source)?;
            stats::run(&mut out, &entries, window, &config, *top, source.json, &clock)?;
        }
        Some(Commands::PeakHours { source, window }) => {
            let (entries, config) = load_entries(cli.config.as_deref(), source)?;
            peak_hours::run(&mut out, &entries, window, &config, source.json, &clock)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().write_help(&mut out)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
