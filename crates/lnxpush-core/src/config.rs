//! Configuration module for LNXPush.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, and defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level configuration for LNXPush.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    pub sync: SyncConfig,
    pub drive: DriveConfig,
    pub logging: LoggingConfig,
}

/// Account lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Provider kind that sync-capable accounts must match (e.g. `drive`).
    pub kind: String,
    /// Whether this installation may enumerate accounts at all.
    ///
    /// This is the capability gate: when `false`, every account-dependent
    /// operation fails closed, equivalent to a missing accounts permission.
    pub allow_enumeration: bool,
    /// Policy applied when more than one matching account exists.
    pub selection: AccountSelection,
}

/// Policy for choosing among multiple matching accounts.
///
/// The enumeration order of the underlying directory is not guaranteed to be
/// stable, so `FirstFound` may pick a different account across runs when
/// several are installed. `RequireSingle` refuses to guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSelection {
    /// Use the first account returned by the directory.
    #[default]
    FirstFound,
    /// Fail unless exactly one matching account exists.
    RequireSingle,
}

/// Synchronization target settings.
///
/// These are the defaults the daemon registers at startup; explicit
/// `sync to-folder` requests override them per trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Title the uploaded file gets in the cloud folder.
    pub file_title: String,
    /// Local file that each sync attempt uploads.
    pub local_file_path: PathBuf,
}

/// Cloud drive / OAuth settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveConfig {
    /// OAuth application (client) ID. `None` until the user configures one.
    pub app_id: Option<String>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/lnxpush/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("lnxpush")
            .join("config.yaml")
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            kind: "drive".to_string(),
            allow_enumeration: true,
            selection: AccountSelection::FirstFound,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            file_title: String::new(),
            local_file_path: PathBuf::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
