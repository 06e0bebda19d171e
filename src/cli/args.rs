//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

const AFTER_HELP: &str = "\
Quick Start:
  $ placemark list                          # Show the bookmarks list
  $ placemark add ~/Projects --name Code    # Bookmark a directory
  $ placemark get View/SortRole --dir .     # Resolve a setting for a directory
  $ placemark watch                         # Follow mounts and document edits";

#[derive(Parser)]
#[command(
    name = "placemark",
    version,
    about = "Bookmark list and layered directory settings",
    styles = clap_cargo_style(),
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to a custom placemark.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show every row of the bookmarks list
    List {
        /// Output rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bookmark a directory
    Add {
        path: String,

        /// Display name, defaults to the last path segment
        #[arg(short, long, default_value = "")]
        name: String,
    },

    /// Remove a bookmark
    Remove { path: String },

    /// Rename a bookmark
    Rename { path: String, name: String },

    /// Move a bookmark from one row to another
    Move { from: usize, to: usize },

    /// Show mounted volumes and whether they are listed
    Mounts,

    /// Resolve settings, all documented ones when no key is given
    Get {
        key: Option<String>,

        /// Directory whose local settings apply
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Store a setting
    Set {
        key: String,
        value: String,

        /// Directory whose local settings apply
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print the directory a new window opens in
    InitialDir {
        /// Directory requested on the command line of the file browser
        #[arg(long)]
        forced: Option<PathBuf>,
    },

    /// Follow mount changes and external edits until interrupted
    Watch,
}
