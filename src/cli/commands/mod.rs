//! Command implementations for the CLI.
//!
//! Each command group is implemented in its own module.

pub mod bookmarks;
pub mod init;
pub mod mounts;
pub mod settings;
pub mod watch;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::settings::{RawSettings, SettingsResolver};

/// Settings resolver over the global settings file named in `config`.
pub fn open_settings(config: &AppConfig) -> SettingsResolver {
    let raw = RawSettings::new(config.settings_path(), config.writable_roots.clone());
    SettingsResolver::new(Arc::new(raw))
}
