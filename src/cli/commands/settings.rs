//! Settings commands (get, set, initial-dir).

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::settings::DirectorySettings;
use crate::settings::keys::{self, CATALOG};

use super::open_settings;

fn directory_settings(config: &AppConfig, dir: Option<&Path>) -> DirectorySettings {
    let resolver = open_settings(config);
    match dir {
        Some(dir) => DirectorySettings::new(resolver, dir),
        None => DirectorySettings::global(resolver),
    }
}

/// Print one setting, or every documented setting when `key` is `None`.
pub fn run_get(config: &AppConfig, key: Option<&str>, dir: Option<&Path>) -> anyhow::Result<()> {
    let settings = directory_settings(config, dir);
    let local_file = settings.local_file();

    match key {
        Some(key) => {
            let Some(entry) = keys::find(key) else {
                anyhow::bail!("Unknown setting: {key}");
            };
            println!("{}", entry.get_text(settings.resolver(), local_file));
        }
        None => {
            for entry in CATALOG {
                println!(
                    "{:<42} {}",
                    entry.global_key(),
                    entry.get_text(settings.resolver(), local_file)
                );
            }
        }
    }
    Ok(())
}

pub fn run_set(config: &AppConfig, key: &str, value: &str, dir: Option<&Path>) -> anyhow::Result<()> {
    let settings = directory_settings(config, dir);
    let Some(entry) = keys::find(key) else {
        anyhow::bail!("Unknown setting: {key}");
    };

    entry
        .set_text(settings.resolver(), settings.local_file(), value)
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{key} = {}", entry.get_text(settings.resolver(), settings.local_file()));
    Ok(())
}

pub fn run_initial_dir(config: &AppConfig, forced: Option<&Path>) {
    let settings = directory_settings(config, None);
    let dir: PathBuf = settings.initial_directory(forced);
    println!("{}", dir.display());
}
