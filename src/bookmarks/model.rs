//! The bookmarks list model.
//!
//! Ties the entry store to its persisted document, the mount ignore list,
//! the live mount source and the path observers. All public operations are
//! safe to call with any input: invalid requests are ignored and persistence
//! failures are logged while the in-memory list stays as it is.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use super::events::{ModelBroadcaster, ModelEvent};
use super::ignore::IgnoreList;
use super::migrate::{MigrationOutcome, spawn_migration};
use super::mounts::{MountSource, SystemMounts};
use super::poller::ReconcileTimer;
use super::reconciler::{DeviceChanges, reconcile};
use super::standard::StandardLocations;
use super::store::{Boundaries, EntryStore};
use super::types::{
    BookmarkEntry, BookmarkGroup, BookmarkRecord, GroupOrder, Role, RoleData,
    default_bookmark_name,
};
use crate::config::AppConfig;
use crate::error::{PlacesError, PlacesResult};
use crate::settings::{RawSettings, SettingsResolver, keys::BOOKMARKS_GROUP_ORDER};
use crate::watcher::{
    ConfigFileMonitor, MonitorStart, ObserverRegistry, PathObserver, is_same_observer,
};

type MigrationHandle = JoinHandle<PlacesResult<MigrationOutcome>>;

/// What one timer tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub bookmarks_reloaded: bool,
    pub ignore_list_reloaded: bool,
    pub devices: DeviceChanges,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        !self.bookmarks_reloaded && !self.ignore_list_reloaded && self.devices.is_empty()
    }
}

pub struct BookmarksModel {
    store: EntryStore,
    bookmarks: ConfigFileMonitor,
    ignored_mounts: ConfigFileMonitor,
    ignore_list: IgnoreList,
    mounts: Box<dyn MountSource>,
    locations: StandardLocations,
    watchers: ObserverRegistry,
    timer: ReconcileTimer,
    migration: Option<MigrationHandle>,
    pending_refreshes: Vec<Arc<dyn PathObserver>>,
}

impl BookmarksModel {
    pub fn builder() -> BookmarksModelBuilder {
        BookmarksModelBuilder::new()
    }

    /// Model for the files named in `config`, with system mounts, detected
    /// standard locations and the group order stored in `settings`.
    pub fn from_config(config: &AppConfig, settings: &SettingsResolver) -> PlacesResult<Self> {
        BookmarksModel::builder()
            .bookmarks_file(config.bookmarks_path())
            .ignored_mounts_file(config.ignored_mounts_path())
            .poll_interval(config.poll_interval())
            .group_order(settings.get_setting(&BOOKMARKS_GROUP_ORDER, None))
            .migrate_from(settings.shared())
            .build()
    }

    // List view contract

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn data(&self, row: usize, role: Role) -> Option<RoleData> {
        self.store.data(row, role)
    }

    pub fn role_names(&self) -> Vec<(Role, &'static str)> {
        Role::ALL.iter().map(|role| (*role, role.name())).collect()
    }

    pub fn entries(&self) -> &[BookmarkEntry] {
        self.store.entries()
    }

    pub fn get(&self, row: usize) -> Option<&BookmarkEntry> {
        self.store.get(row)
    }

    pub fn boundaries(&self) -> Boundaries {
        self.store.boundaries()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.store.events().subscribe()
    }

    /// Current paths of the given rows. Rows out of range are skipped.
    pub fn paths_for_rows(&self, rows: &[usize]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| self.store.get(*row))
            .map(|entry| entry.path.clone())
            .collect()
    }

    pub fn group_order(&self) -> &GroupOrder {
        self.store.order()
    }

    pub fn timer(&self) -> &ReconcileTimer {
        &self.timer
    }

    pub fn bookmarks_file(&self) -> Option<&Path> {
        self.bookmarks.file()
    }

    /// Raw text of the bookmarks document, empty if it cannot be read.
    pub fn load_bookmarks_file(&self) -> String {
        self.bookmarks.read_file()
    }

    // Reloading

    /// Rebuild the whole list.
    ///
    /// Standard locations are recomputed, user bookmarks are read from the
    /// document and the external run starts empty before it is reconciled
    /// with the live mounts. A malformed document keeps the bookmarks that
    /// were loaded before. Temporary entries stay at the start of the user
    /// run unless the document now bookmarks the same path.
    pub fn reload(&mut self) {
        self.timer.stop();

        let permanent = match self.read_bookmarks() {
            Some(entries) => entries,
            None => self.store.permanent_entries().cloned().collect(),
        };
        let mut user_entries: Vec<BookmarkEntry> = self
            .store
            .temporary_entries()
            .filter(|temporary| !permanent.iter().any(|e| e.path == temporary.path))
            .cloned()
            .collect();
        user_entries.extend(permanent);
        let locations = self.locations.entries();

        self.store.reset(locations, user_entries);
        crate::debug_event!(
            "bookmarks",
            "reloaded",
            "{} rows, order {}",
            self.store.len(),
            self.store.order()
        );

        self.update_external_devices();
        self.timer.start();

        for path in self.watchers.paths() {
            self.queue_refresh(&path);
        }
    }

    /// Entries of the bookmarks document, `None` if it cannot be used.
    fn read_bookmarks(&mut self) -> Option<Vec<BookmarkEntry>> {
        let file = self
            .bookmarks
            .file()
            .map(|f| f.display().to_string())
            .unwrap_or_default();

        let items = match self.bookmarks.read_json() {
            Ok(None) => return Some(Vec::new()),
            Ok(Some(Value::Array(items))) => items,
            Ok(Some(other)) => {
                tracing::warn!("[bookmarks] invalid bookmarks data in {file}: {other}");
                return None;
            }
            Err(e) => {
                tracing::warn!("[bookmarks] invalid bookmarks data in {file}: {e}");
                return None;
            }
        };

        let mut entries: Vec<BookmarkEntry> = Vec::with_capacity(items.len());
        for item in items {
            let Some(object) = item.as_object() else {
                tracing::warn!("[bookmarks] invalid bookmarks entry in {file}: {item}");
                continue;
            };

            let path = object.get("path").and_then(Value::as_str).unwrap_or_default();
            if path.is_empty() {
                tracing::warn!(
                    "[bookmarks] invalid bookmarks entry in {file}: {item} - path must not be empty"
                );
                continue;
            }
            if entries.iter().any(|e| e.path == path) {
                tracing::warn!("[bookmarks] duplicate bookmark in {file}: {path}");
                continue;
            }

            let name = object
                .get("name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_bookmark_name(path));
            entries.push(BookmarkEntry::user_defined(path, name, true));
        }

        Some(entries)
    }

    /// Reload the mount ignore list, writing the defaults if it is missing.
    /// A malformed list keeps the previous one.
    pub fn reload_ignored_mounts(&mut self) -> bool {
        match IgnoreList::load(&mut self.ignored_mounts) {
            Some(list) => {
                self.ignore_list = list;
                true
            }
            None => false,
        }
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore_list
    }

    // Persistence

    /// Write the permanent bookmarks to the document.
    pub fn save(&mut self) {
        self.settle_migration();
        let records: Vec<BookmarkRecord> = self
            .store
            .permanent_entries()
            .map(|entry| BookmarkRecord {
                name: entry.name.clone(),
                path: entry.path.clone(),
            })
            .collect();

        let written = serde_json::to_value(&records)
            .map_err(PlacesError::from)
            .and_then(|document| self.bookmarks.write_json(&document));
        match written {
            Ok(()) => crate::debug_event!("bookmarks", "saved", "{} bookmarks", records.len()),
            Err(e) => tracing::warn!("[bookmarks] failed to save bookmarks: {e}"),
        }
    }

    // User operations

    /// Add a user bookmark.
    ///
    /// Empty or already bookmarked paths are ignored. An empty name becomes
    /// the last path segment. Permanent bookmarks are saved and announced to
    /// their watchers, temporary ones are neither.
    pub fn add_user_defined(&mut self, path: &str, name: &str, permanent: bool) {
        self.settle_migration();
        if path.is_empty() || self.store.contains_user_path(path) {
            return;
        }

        let name = if name.is_empty() {
            default_bookmark_name(path)
        } else {
            name.to_string()
        };

        if self
            .store
            .insert_user(BookmarkEntry::user_defined(path, name, permanent))
            .is_some()
            && permanent
        {
            self.save();
            self.queue_refresh(path);
        }
    }

    pub fn add(&mut self, path: &str, name: &str) {
        self.add_user_defined(path, name, true);
    }

    pub fn add_temporary(&mut self, path: &str, name: &str) {
        self.add_user_defined(path, name, false);
    }

    /// Remove the user bookmark with this path. Removing a permanent
    /// bookmark saves and notifies watchers.
    ///
    /// Does nothing when `permanent` does not match the entry: a temporary
    /// removal never drops a saved bookmark and the other way round.
    pub fn remove_user_defined(&mut self, path: &str, permanent: bool) {
        self.settle_migration();
        let group = if permanent {
            BookmarkGroup::Bookmark
        } else {
            BookmarkGroup::Temporary
        };
        if !self.store.user_entry(path).is_some_and(|e| e.group == group) {
            return;
        }

        if self.store.remove_user(path).is_some() && permanent {
            self.queue_refresh(path);
            self.save();
        }
    }

    pub fn remove(&mut self, path: &str) {
        self.remove_user_defined(path, true);
    }

    pub fn remove_temporary(&mut self, path: &str) {
        self.remove_user_defined(path, false);
    }

    pub fn rename(&mut self, path: &str, name: &str) {
        self.settle_migration();
        if self.store.rename_user(path, name) {
            self.save();
            self.queue_refresh(path);
        }
    }

    /// Move a user bookmark from one row to another inside the user run.
    ///
    /// During drag and drop, pass `save_immediately = false` for the
    /// intermediate steps and call [`save`](Self::save) on drop.
    pub fn move_entry(&mut self, from: usize, to: usize, save_immediately: bool) -> bool {
        self.settle_migration();
        let moved = self.store.move_user(from, to);
        if moved {
            crate::debug_event!("bookmarks", "moved", "{from} -> {to}");
            if save_immediately {
                self.save();
            }
        }
        moved
    }

    pub fn move_up(&mut self, path: &str) -> bool {
        match self.store.user_row(path) {
            Some(row) if row > self.store.user_rows().start => self.move_entry(row, row - 1, true),
            _ => false,
        }
    }

    pub fn move_down(&mut self, path: &str) -> bool {
        match self.store.user_row(path) {
            Some(row) if row + 1 < self.store.user_rows().end => self.move_entry(row, row + 1, true),
            _ => false,
        }
    }

    pub fn clear_temporary(&mut self) -> usize {
        self.store.clear_temporary()
    }

    pub fn has_bookmark(&self, path: &str) -> bool {
        self.store
            .user_entry(path)
            .is_some_and(|entry| entry.group == BookmarkGroup::Bookmark)
    }

    /// Name of the bookmark with this path, empty if there is none.
    pub fn bookmark_name(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        self.store
            .user_entry(path)
            .map(|entry| entry.name.clone())
            .unwrap_or_default()
    }

    /// Point a row at one of its alternatives.
    ///
    /// A path that is not among the row's alternatives leaves the row with an
    /// empty path instead of an arbitrary one.
    pub fn select_alternative(&mut self, row: usize, path: &str) {
        let Some(entry) = self.store.get(row) else {
            return;
        };
        if entry.path == path {
            return;
        }

        let target = if entry.has_alternative(path) {
            path.to_string()
        } else {
            tracing::warn!(
                "[bookmarks] cannot select {path} as alternative for {}",
                entry.default_path
            );
            String::new()
        };

        self.store.update_row(row, |entry| {
            entry.path = target;
            vec![Role::Path]
        });
    }

    /// Change the group order. Any change rebuilds the list.
    pub fn set_group_order(&mut self, order: GroupOrder) -> bool {
        if &order == self.store.order() {
            return false;
        }

        crate::log_event!("bookmarks", "group order changed", "{order}");
        self.store.set_order(order);
        self.reload();
        true
    }

    /// Pick up settings the list depends on.
    pub fn apply_settings(&mut self, settings: &SettingsResolver) -> bool {
        self.set_group_order(settings.get_setting(&BOOKMARKS_GROUP_ORDER, None))
    }

    // Watchers

    pub fn register_watcher(&mut self, path: &str, observer: &Arc<dyn PathObserver>) {
        self.watchers.register(path, observer);
    }

    pub fn unregister_watcher(&mut self, path: &str, observer: &Arc<dyn PathObserver>) {
        self.watchers.unregister(path, observer);
    }

    /// Queue a refresh for every watcher of `path`. Returns how many there
    /// are.
    pub fn notify_watchers(&mut self, path: &str) -> usize {
        self.queue_refresh(path)
    }

    fn queue_refresh(&mut self, path: &str) -> usize {
        let observers = self.watchers.observers_for(path);
        let count = observers.len();
        for observer in observers {
            if !self
                .pending_refreshes
                .iter()
                .any(|queued| is_same_observer(queued, &observer))
            {
                self.pending_refreshes.push(observer);
            }
        }
        count
    }

    /// Watchers waiting for a refresh. Each one is handed out once.
    pub fn take_refreshes(&mut self) -> Vec<Arc<dyn PathObserver>> {
        std::mem::take(&mut self.pending_refreshes)
    }

    /// Run `edit` on a shared model, then refresh the watchers it touched
    /// after the lock is released.
    ///
    /// Watchers may read the model from their refresh. Edits made through a
    /// plain lock keep their refreshes queued until the next call.
    pub fn edit<R>(model: &Mutex<Self>, edit: impl FnOnce(&mut Self) -> R) -> R {
        let (result, refreshes) = {
            let mut model = model.lock();
            let result = edit(&mut model);
            (result, model.take_refreshes())
        };

        if !refreshes.is_empty() {
            crate::debug_event!("watchers", "refreshing", "{}", refreshes.len());
        }
        for observer in refreshes {
            observer.refresh();
        }
        result
    }

    // Devices

    /// Reconcile the external run with the live mounts.
    pub fn update_external_devices(&mut self) -> DeviceChanges {
        let was_running = self.timer.stop();
        let changes = reconcile(&mut self.store, self.mounts.as_ref(), &self.ignore_list);
        if was_running {
            self.timer.start();
        }
        changes
    }

    /// One timer tick: finish a pending migration, pick up external changes
    /// of the documents and reconcile devices.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if self.migration_finished() && self.settle_migration() {
            report.bookmarks_reloaded = true;
        }

        if self.ignored_mounts.poll_changes() || self.ignored_mounts.check_for_changes() {
            report.ignore_list_reloaded = self.reload_ignored_mounts();
        }

        if self.bookmarks.poll_changes() || self.bookmarks.check_for_changes() {
            crate::log_event!("bookmarks", "bookmarks changed on disk");
            self.reload();
            report.bookmarks_reloaded = true;
        } else if self.timer.is_running() {
            report.devices = self.update_external_devices();
        }

        report
    }

    fn migration_finished(&self) -> bool {
        self.migration.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// Wait for a pending migration and reload if it moved anything.
    pub fn wait_for_migration(&mut self) {
        self.settle_migration();
    }

    /// Join a pending migration before the document is touched, so the
    /// migrated records and the user's edits cannot overwrite each other.
    fn settle_migration(&mut self) -> bool {
        let Some(handle) = self.migration.take() else {
            return false;
        };
        let migrated = match handle.join() {
            Ok(Ok(MigrationOutcome::Migrated(count))) => count > 0,
            Ok(Ok(MigrationOutcome::NotNeeded)) => false,
            Ok(Err(e)) => {
                tracing::warn!("[migrate] bookmark migration failed: {e}");
                false
            }
            Err(_) => {
                tracing::warn!("[migrate] bookmark migration panicked");
                false
            }
        };
        if migrated {
            self.reload();
        }
        migrated
    }
}

/// Builder for [`BookmarksModel`].
pub struct BookmarksModelBuilder {
    bookmarks_file: Option<PathBuf>,
    ignored_mounts_file: Option<PathBuf>,
    mounts: Option<Box<dyn MountSource>>,
    locations: Option<StandardLocations>,
    order: GroupOrder,
    events: Option<ModelBroadcaster>,
    poll_interval: Option<Duration>,
    legacy_settings: Option<Arc<RawSettings>>,
}

impl BookmarksModelBuilder {
    pub fn new() -> Self {
        Self {
            bookmarks_file: None,
            ignored_mounts_file: None,
            mounts: None,
            locations: None,
            order: GroupOrder::default(),
            events: None,
            poll_interval: None,
            legacy_settings: None,
        }
    }

    /// Set the bookmarks document.
    pub fn bookmarks_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.bookmarks_file = Some(path.into());
        self
    }

    /// Set the mount ignore list document.
    pub fn ignored_mounts_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored_mounts_file = Some(path.into());
        self
    }

    /// Set the mount source. Defaults to the system mounts.
    pub fn mounts(mut self, mounts: impl MountSource + 'static) -> Self {
        self.mounts = Some(Box::new(mounts));
        self
    }

    /// Set the standard locations. Defaults to the detected ones.
    pub fn locations(mut self, locations: StandardLocations) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn group_order(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    /// Share an existing event broadcaster.
    pub fn events(mut self, events: ModelBroadcaster) -> Self {
        self.events = Some(events);
        self
    }

    pub fn poll_interval(mut self, period: Duration) -> Self {
        self.poll_interval = Some(period);
        self
    }

    /// Migrate legacy bookmarks from these settings when the bookmarks
    /// document does not exist yet.
    pub fn migrate_from(mut self, settings: Arc<RawSettings>) -> Self {
        self.legacy_settings = Some(settings);
        self
    }

    /// Build the model and load everything once.
    pub fn build(self) -> PlacesResult<BookmarksModel> {
        let bookmarks_file = self
            .bookmarks_file
            .ok_or(PlacesError::MissingOption("bookmarks file"))?;
        let ignored_mounts_file = self
            .ignored_mounts_file
            .ok_or(PlacesError::MissingOption("ignored mounts file"))?;

        let migration = match self.legacy_settings {
            Some(raw) if !bookmarks_file.exists() => {
                Some(spawn_migration(raw, bookmarks_file.clone())?)
            }
            _ => None,
        };

        let mut ignored_mounts = ConfigFileMonitor::new();
        ignored_mounts.reset(&ignored_mounts_file, MonitorStart::Watching);
        let mut bookmarks = ConfigFileMonitor::new();
        bookmarks.reset(&bookmarks_file, MonitorStart::Watching);

        let mut model = BookmarksModel {
            store: EntryStore::new(self.order, self.events.unwrap_or_default()),
            bookmarks,
            ignored_mounts,
            ignore_list: IgnoreList::default(),
            mounts: self.mounts.unwrap_or_else(|| Box::new(SystemMounts)),
            locations: self.locations.unwrap_or_else(StandardLocations::detect),
            watchers: ObserverRegistry::new(),
            timer: ReconcileTimer::new(
                self.poll_interval
                    .unwrap_or(super::poller::DEFAULT_POLL_INTERVAL),
            ),
            migration,
            pending_refreshes: Vec::new(),
        };

        model.reload_ignored_mounts();
        model.reload();
        Ok(model)
    }
}

impl Default for BookmarksModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::events::drain;
    use tempfile::TempDir;

    fn model_in(dir: &TempDir) -> BookmarksModel {
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        BookmarksModel::builder()
            .bookmarks_file(dir.path().join("bookmarks.json"))
            .ignored_mounts_file(dir.path().join("ignored-mounts.json"))
            .mounts(NoMounts)
            .locations(StandardLocations::under(home))
            .build()
            .unwrap()
    }

    struct NoMounts;

    impl MountSource for NoMounts {
        fn mounted_volumes(&self) -> Vec<super::super::mounts::MountedVolume> {
            Vec::new()
        }
    }

    #[test]
    fn test_missing_options() {
        assert!(matches!(
            BookmarksModel::builder().build(),
            Err(PlacesError::MissingOption(_))
        ));
    }

    #[test]
    fn test_fresh_model() {
        let dir = TempDir::new().unwrap();
        let model = model_in(&dir);

        assert_eq!(model.row_count(), 7);
        assert!(model.timer().is_running());
        assert!(dir.path().join("ignored-mounts.json").exists());
        assert!(model.ignore_list().is_exact("/persist"));
        assert_eq!(model.role_names()[2], (Role::Icon, "thumbnail"));
    }

    #[test]
    fn test_permanent_bookmarks_are_saved() {
        let dir = TempDir::new().unwrap();
        let mut model = model_in(&dir);

        model.add("/srv/share", "");
        model.add_temporary("/tmp/scratch", "scratch");

        let records: Vec<BookmarkRecord> =
            serde_json::from_str(&model.load_bookmarks_file()).unwrap();
        assert_eq!(
            records,
            vec![BookmarkRecord {
                name: "share".to_string(),
                path: "/srv/share".to_string()
            }]
        );
        assert!(model.has_bookmark("/srv/share"));
        assert!(!model.has_bookmark("/tmp/scratch"));
        assert_eq!(model.bookmark_name("/tmp/scratch"), "scratch");
        assert_eq!(model.bookmark_name("/nowhere"), "");
    }

    #[test]
    fn test_malformed_document_keeps_bookmarks() {
        let dir = TempDir::new().unwrap();
        let mut model = model_in(&dir);
        model.add("/srv/a", "a");

        std::fs::write(dir.path().join("bookmarks.json"), "{\"oops\": 1}").unwrap();
        model.reload();

        assert!(model.has_bookmark("/srv/a"));
    }

    #[test]
    fn test_document_entries_are_validated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("bookmarks.json"),
            r#"[{"path": "/srv/a"}, 3, {"name": "no path"}, {"path": "/srv/a", "name": "dup"}, {"path": "/srv/b", "name": "Bee"}]"#,
        )
        .unwrap();
        let model = model_in(&dir);

        assert_eq!(model.bookmark_name("/srv/a"), "a");
        assert_eq!(model.bookmark_name("/srv/b"), "Bee");
        assert_eq!(model.boundaries().last_user_defined, Some(model.row_count() - 1));
        assert_eq!(model.store.user_rows().len(), 2);
    }

    #[test]
    fn test_move_up_and_down() {
        let dir = TempDir::new().unwrap();
        let mut model = model_in(&dir);
        model.add("/a", "");
        model.add("/b", "");

        assert!(!model.move_up("/a"));
        assert!(model.move_up("/b"));
        assert!(!model.move_down("/a"));

        let records: Vec<BookmarkRecord> =
            serde_json::from_str(&model.load_bookmarks_file()).unwrap();
        let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
    }

    #[test]
    fn test_select_alternative() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let android = home.join("android_storage/Music");
        std::fs::create_dir_all(&android).unwrap();
        let mut model = model_in(&dir);

        let row = model
            .entries()
            .iter()
            .position(|e| e.name == "Music")
            .unwrap();
        let alternative = android.to_string_lossy().into_owned();
        let mut rx = model.subscribe();

        model.select_alternative(row, &alternative);
        assert_eq!(model.get(row).unwrap().path, alternative);
        model.select_alternative(row, &alternative);
        assert_eq!(
            drain(&mut rx),
            vec![ModelEvent::DataChanged {
                row,
                roles: vec![Role::Path]
            }]
        );

        model.select_alternative(row, "/not/an/alternative");
        assert_eq!(model.get(row).unwrap().path, "");
        model.select_alternative(9999, "/x");
    }

    #[test]
    fn test_group_order_change_reloads() {
        let dir = TempDir::new().unwrap();
        let mut model = model_in(&dir);
        model.add("/a", "");
        let mut rx = model.subscribe();

        assert!(!model.set_group_order(GroupOrder::default()));
        assert!(model.set_group_order(GroupOrder::new([
            BookmarkGroup::Bookmark,
            BookmarkGroup::Location
        ])));

        assert_eq!(model.get(0).unwrap().path, "/a");
        assert!(drain(&mut rx).contains(&ModelEvent::Reset));
    }

    #[test]
    fn test_external_document_change_reloads_on_tick() {
        let dir = TempDir::new().unwrap();
        let mut model = model_in(&dir);
        model.add("/a", "");

        std::fs::write(
            dir.path().join("bookmarks.json"),
            r#"[{"name": "x", "path": "/x"}]"#,
        )
        .unwrap();
        let report = model.tick();

        assert!(report.bookmarks_reloaded);
        assert!(model.has_bookmark("/x"));
        assert!(!model.has_bookmark("/a"));
        assert!(!model.tick().bookmarks_reloaded);
    }
}
