//! Per-path bookmark state for views that show a single directory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::registry::PathObserver;
use crate::bookmarks::BookmarksModel;

type RefreshCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Tracks whether one path is bookmarked and under which name.
///
/// The watcher registers itself with the model for its path and is refreshed
/// whenever a bookmark for that path is added, removed or renamed. Refreshes
/// run from [`BookmarksModel::edit`] after the model lock is released, so the
/// callback may read the model.
///
/// The model is held weakly. Once it is gone the watcher reports the path as
/// not bookmarked and ignores edits.
pub struct BookmarkWatcher {
    model: Weak<Mutex<BookmarksModel>>,
    path: Mutex<String>,
    refreshes: AtomicUsize,
    on_refresh: Option<RefreshCallback>,
}

impl BookmarkWatcher {
    pub fn new(model: &Arc<Mutex<BookmarksModel>>, path: impl Into<String>) -> Arc<Self> {
        Self::build(model, path.into(), None)
    }

    /// Like [`new`](Self::new), calling `on_refresh` with the path on every
    /// refresh.
    pub fn with_callback<F>(
        model: &Arc<Mutex<BookmarksModel>>,
        path: impl Into<String>,
        on_refresh: F,
    ) -> Arc<Self>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self::build(model, path.into(), Some(Box::new(on_refresh)))
    }

    fn build(
        model: &Arc<Mutex<BookmarksModel>>,
        path: String,
        on_refresh: Option<RefreshCallback>,
    ) -> Arc<Self> {
        let watcher = Arc::new(Self {
            model: Arc::downgrade(model),
            path: Mutex::new(path.clone()),
            refreshes: AtomicUsize::new(0),
            on_refresh,
        });

        if !path.is_empty() {
            let observer: Arc<dyn PathObserver> = watcher.clone();
            model.lock().register_watcher(&path, &observer);
        }
        watcher
    }

    pub fn path(&self) -> String {
        self.path.lock().clone()
    }

    /// Watch another path. Setting the current path again does nothing.
    pub fn set_path(self: &Arc<Self>, path: impl Into<String>) {
        let path = path.into();
        let old = {
            let mut current = self.path.lock();
            if *current == path {
                return;
            }
            std::mem::replace(&mut *current, path.clone())
        };

        if let Some(model) = self.model.upgrade() {
            let observer: Arc<dyn PathObserver> = self.clone();
            BookmarksModel::edit(&model, |model| {
                if !old.is_empty() {
                    model.unregister_watcher(&old, &observer);
                }
                if !path.is_empty() {
                    model.register_watcher(&path, &observer);
                }
            });
        }

        self.refresh();
    }

    /// Whether the path is bookmarked. An empty path never is.
    pub fn marked(&self) -> bool {
        let path = self.path();
        if path.is_empty() {
            return false;
        }
        self.model
            .upgrade()
            .is_some_and(|model| model.lock().has_bookmark(&path))
    }

    /// Bookmark name of the path, empty when it is not bookmarked.
    pub fn name(&self) -> String {
        let path = self.path();
        if path.is_empty() {
            return String::new();
        }
        self.model
            .upgrade()
            .map(|model| model.lock().bookmark_name(&path))
            .unwrap_or_default()
    }

    /// Add or remove the bookmark for the path.
    pub fn set_marked(&self, marked: bool) {
        let path = self.path();
        if path.is_empty() {
            return;
        }
        let Some(model) = self.model.upgrade() else {
            return;
        };

        BookmarksModel::edit(&model, |model| {
            if marked == model.has_bookmark(&path) {
                return;
            }
            if marked {
                model.add(&path, "");
            } else {
                model.remove(&path);
            }
        });
    }

    pub fn toggle(&self) {
        self.set_marked(!self.marked());
    }

    /// Rename the bookmark for the path, if there is one.
    pub fn rename(&self, name: &str) {
        let path = self.path();
        if path.is_empty() {
            return;
        }
        if let Some(model) = self.model.upgrade() {
            BookmarksModel::edit(&model, |model| model.rename(&path, name));
        }
    }

    /// How often the watcher was refreshed so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl PathObserver for BookmarkWatcher {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if let Some(on_refresh) = &self.on_refresh {
            on_refresh(&self.path());
        }
    }
}
