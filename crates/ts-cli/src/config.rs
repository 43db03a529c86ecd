//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ts_core::PeakHoursConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Status log used when `--log` isn't given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Window length when neither `--since` nor `--days` is given.
    pub default_days: u32,

    /// Length of top-N lists.
    pub top_n: usize,

    /// Peak band and zones.
    pub peak_hours: PeakHoursConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: None,
            default_days: 7,
            top_n: 10,
            peak_hours: PeakHoursConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TREE_STATS_*)
        figment = figment.merge(Env::prefixed("TREE_STATS_").split("__"));

        figment.extract()
    }

    /// Resolves the log path from the flag or configuration.
    pub fn log_path(&self, flag: Option<&Path>) -> anyhow::Result<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.log_path.clone())
            .ok_or_else(|| anyhow::anyhow!("no status log given: pass --log or set log_path in config"))
    }
}

/// Returns the platform-specific config directory for tree-stats.
///
/// On Linux: `~/.config/tree-stats`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tree-stats"))
}
