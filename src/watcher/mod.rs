//! Path observers and watched configuration documents.
//!
//! # Architecture
//!
//! ```text
//! BookmarksModel
//!   - ObserverRegistry (path -> weak observers)
//!         |
//!    +----------+----------+
//!    |          |          |
//! BookmarkWatcher ...  BookmarkWatcher
//!
//! Model edits queue refreshes; BookmarksModel::edit runs them after the
//! model lock is released.
//!
//! ConfigFileMonitor
//!   - notify::RecommendedWatcher on the parent directory
//!   - pause/resume around its own writes
//! ```

mod bookmark;
mod error;
mod monitor;
mod registry;

pub use bookmark::BookmarkWatcher;
pub use error::WatchError;
pub use monitor::{ConfigFileMonitor, MonitorStart};
pub use registry::{ObserverRegistry, PathObserver, is_same_observer};
