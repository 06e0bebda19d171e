pub mod bookmarks;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod settings;
pub mod watcher;

pub use bookmarks::{
    BookmarkEntry, BookmarkGroup, BookmarksModel, GroupOrder, LocationAlternative, SharedModel,
};
pub use config::AppConfig;
pub use error::{PlacesError, PlacesResult};
pub use settings::{DirectorySettings, RawSettings, SettingsResolver};
pub use watcher::BookmarkWatcher;
