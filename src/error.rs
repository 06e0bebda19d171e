//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

use crate::watcher::WatchError;

/// Errors from persistence and configuration operations.
///
/// UI-facing model operations do not surface these; they log and keep the
/// last known good state instead.
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse settings file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize settings file: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Watcher error: {0}")]
    Watch(#[from] WatchError),

    #[error("No file configured for this monitor")]
    NoFile,

    #[error("{0} is required")]
    MissingOption(&'static str),
}

pub type PlacesResult<T> = Result<T, PlacesError>;
