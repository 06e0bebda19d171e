//! The bookmarks list: standard locations, mounted devices and user
//! bookmarks in one ordered model.
//!
//! # Architecture
//!
//! ```text
//! BookmarksModel
//!   - EntryStore      rows, group runs, boundary cursors, path index
//!   - reconcile()     mounts -> external run -> location alternatives
//!   - IgnoreList      mount roots that never show up
//!   - ObserverRegistry
//!   - ConfigFileMonitor x2 (bookmarks document, ignore list)
//! ```

mod alternates;
mod events;
mod ignore;
mod migrate;
mod model;
mod mounts;
mod poller;
mod reconciler;
mod standard;
mod store;
mod types;

pub use alternates::update_alternatives;
pub use events::{ModelBroadcaster, ModelEvent, drain};
pub use ignore::{IgnoreDocument, IgnoreList};
pub use migrate::{MigrationOutcome, migrate_bookmarks, spawn_migration};
pub use model::{BookmarksModel, BookmarksModelBuilder, TickReport};
pub use mounts::{DeviceKind, MountSource, MountedVolume, SystemMounts, external_entry};
pub use poller::{DEFAULT_POLL_INTERVAL, ReconcileTimer, run_polling};
pub use reconciler::{DeviceChanges, is_candidate, reconcile};
pub use standard::StandardLocations;
pub use store::{Boundaries, EntryStore};
pub use types::{
    BookmarkEntry, BookmarkGroup, BookmarkRecord, GroupOrder, INTERNAL_STORAGE,
    LocationAlternative, Role, RoleData, WellKnownFolder, default_bookmark_name,
};

/// The model as shared between the poller, watchers and views.
pub type SharedModel = std::sync::Arc<parking_lot::Mutex<BookmarksModel>>;
