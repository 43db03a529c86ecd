//! Tree-status statistics CLI library.
//!
//! This crate provides the CLI interface and status-log loading for
//! `tree-stats`.

mod cli;
pub mod commands;
mod config;
pub mod log;

pub use cli::{Cli, Commands, SourceArgs, WindowArgs};
pub use config::Config;
