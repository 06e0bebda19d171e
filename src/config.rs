//! Configuration module for the places engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `PLACEMARK_` and use double
//! underscores to separate nested levels:
//! - `PLACEMARK_POLL_INTERVAL_SECS=10` sets `poll_interval_secs`
//! - `PLACEMARK_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PlacesResult;

/// Name of the optional configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "placemark.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding all persisted documents and the global settings file
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// File name of the user bookmarks document
    #[serde(default = "default_bookmarks_file")]
    pub bookmarks_file: String,

    /// File name of the mount point ignore list
    #[serde(default = "default_ignored_mounts_file")]
    pub ignored_mounts_file: String,

    /// File name of the global settings file
    #[serde(default = "default_settings_file")]
    pub settings_file: String,

    /// Seconds between two mount reconciliation runs
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Only settings files below these roots are written to disk.
    /// Everything else is shadowed in memory.
    #[serde(default = "default_writable_roots")]
    pub writable_roots: Vec<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target level overrides
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("placemark")
}
fn default_bookmarks_file() -> String { "bookmarks.json".to_string() }
fn default_ignored_mounts_file() -> String { "ignored-mounts.json".to_string() }
fn default_settings_file() -> String { "settings.toml".to_string() }
fn default_poll_interval_secs() -> u64 { 5 }
fn default_log_level() -> String { "warn".to_string() }

fn default_writable_roots() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    let mut roots = vec![home.clone()];
    if let Some(user) = home.file_name() {
        roots.push(Path::new("/run/media").join(user));
    }
    roots
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            bookmarks_file: default_bookmarks_file(),
            ignored_mounts_file: default_ignored_mounts_file(),
            settings_file: default_settings_file(),
            poll_interval_secs: default_poll_interval_secs(),
            writable_roots: default_writable_roots(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from(Self::default_path())
    }

    /// Location of the configuration file when none is given
    pub fn default_path() -> PathBuf {
        default_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            // Double underscore separates nested levels, single underscores stay
            .merge(Env::prefixed("PLACEMARK_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> PlacesResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.config_dir.join(&self.bookmarks_file)
    }

    pub fn ignored_mounts_path(&self) -> PathBuf {
        self.config_dir.join(&self.ignored_mounts_file)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.bookmarks_file, "bookmarks.json");
        assert_eq!(config.logging.default, "warn");
        assert!(config.bookmarks_path().ends_with("placemark/bookmarks.json"));
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("placemark.toml");

        let toml_content = r#"
config_dir = "/tmp/places-test"
poll_interval_secs = 2

[logging]
default = "debug"

[logging.modules]
"placemark::bookmarks" = "trace"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(config.config_dir, PathBuf::from("/tmp/places-test"));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.logging.default, "debug");
        assert_eq!(config.logging.modules["placemark::bookmarks"], "trace");
        // Untouched values keep their defaults
        assert_eq!(config.ignored_mounts_file, "ignored-mounts.json");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("placemark.toml");

        let config = AppConfig {
            config_dir: temp_dir.path().to_path_buf(),
            poll_interval_secs: 30,
            ..AppConfig::default()
        };
        config.save(&config_path).unwrap();

        let loaded = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(loaded.poll_interval_secs, 30);
        assert_eq!(loaded.config_dir, temp_dir.path());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = AppConfig {
            poll_interval_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
