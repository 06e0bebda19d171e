//! Command-line interface over the bookmarks model and the settings store.
//!
//! Provides argument parsing and command dispatch.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
