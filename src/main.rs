use clap::Parser;

use placemark::cli::commands::{bookmarks, init, mounts, settings, watch};
use placemark::cli::{Cli, Commands};
use placemark::{AppConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load_from(&config_path)
        .map_err(|e| anyhow::anyhow!("Error loading configuration: {e}"))?;
    logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Init { force } => init::run_init(&config, &config_path, force),
        Commands::List { json } => bookmarks::run_list(&config, json)?,
        Commands::Add { path, name } => bookmarks::run_add(&config, &path, &name)?,
        Commands::Remove { path } => bookmarks::run_remove(&config, &path)?,
        Commands::Rename { path, name } => bookmarks::run_rename(&config, &path, &name)?,
        Commands::Move { from, to } => bookmarks::run_move(&config, from, to)?,
        Commands::Mounts => mounts::run_mounts(&config)?,
        Commands::Get { key, dir } => settings::run_get(&config, key.as_deref(), dir.as_deref())?,
        Commands::Set { key, value, dir } => {
            settings::run_set(&config, &key, &value, dir.as_deref())?
        }
        Commands::InitialDir { forced } => settings::run_initial_dir(&config, forced.as_deref()),
        Commands::Watch => watch::run_watch(&config).await?,
    }

    Ok(())
}
