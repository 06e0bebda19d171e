//! Init command.

use std::path::Path;

use crate::config::AppConfig;

/// Run init command - write the effective configuration to `config_path`.
pub fn run_init(config: &AppConfig, config_path: &Path, force: bool) {
    if config_path.exists() && !force {
        eprintln!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        eprintln!("Use --force to overwrite");
        std::process::exit(1);
    }

    match config.save(config_path) {
        Ok(()) => {
            println!("Created configuration file at: {}", config_path.display());
            println!("Edit this file to customize your settings.");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
