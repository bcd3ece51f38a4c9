//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::Duration;
use clk_core::{Behavior, Settings, Work};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Record store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    /// A single SQLite file at `database_path`.
    #[default]
    Sqlite,
    /// A directory of yearly JSON documents at `database_path`.
    Json,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file or JSON directory, depending on `storage`.
    pub database_path: PathBuf,
    pub storage: Storage,
    pub behavior: Behavior,
    pub work: Work,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("clk.db"),
            storage: Storage::default(),
            behavior: Behavior::default(),
            work: Work {
                duration: Some(Duration::hours(8)),
                pause_time: Some(Duration::minutes(30)),
                vacation_days: Some(30),
            },
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

        // Load from environment variables (CLK_*, CLK_WORK__PAUSE_TIME=0:45)
        figment = figment.merge(Env::prefixed("CLK_").split("__"));

        figment.extract()
    }

    /// The settings snapshot handed to the tracker and the statistics.
    pub const fn settings(&self) -> Settings {
        Settings {
            behavior: self.behavior,
            work: self.work,
        }
    }
}

/// Returns the platform-specific config directory for clk.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clk"))
}

/// Returns the platform-specific data directory for clk.
///
/// On Linux: `~/.local/share/clk`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("clk"))
}
