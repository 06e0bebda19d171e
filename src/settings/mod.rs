//! Global and per-directory settings.
//!
//! [`RawSettings`] stores strings in TOML files, [`SettingsResolver`] layers a
//! directory's local file over the global file, and [`keys`] lists the
//! documented settings with their valid values.

mod directory;
pub mod keys;
mod mapping;
mod raw;
mod resolver;

pub use directory::{DirectorySettings, LOCAL_FILE_NAME};
pub use keys::{CatalogEntry, InitialDirectoryMode, SettingKey};
pub use mapping::{Mapping, SettingValue};
pub use raw::{RawSettings, SettingsEvent};
pub use resolver::SettingsResolver;
