//! Observer registry keyed by path.
//!
//! Observers are held weakly: dropping the last strong reference to an
//! observer is enough to unregister it. Dead entries are pruned whenever the
//! list for their path is touched.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Something that wants to hear about bookmark changes for one path.
pub trait PathObserver: Send + Sync {
    /// Re-read whatever state the observer caches for its path.
    fn refresh(&self);
}

/// Registry mapping paths to weakly held observers.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: HashMap<String, Vec<Weak<dyn PathObserver>>>,
}

/// Whether two handles point at the same observer.
pub fn is_same_observer(a: &Arc<dyn PathObserver>, b: &Arc<dyn PathObserver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn same_observer(weak: &Weak<dyn PathObserver>, observer: &Arc<dyn PathObserver>) -> bool {
    // Compare data pointers only; vtable pointers may differ between codegen units.
    std::ptr::addr_eq(weak.as_ptr(), Arc::as_ptr(observer))
}

impl ObserverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for a path. Registering twice is a no-op.
    pub fn register(&mut self, path: &str, observer: &Arc<dyn PathObserver>) {
        let list = self.observers.entry(path.to_string()).or_default();
        list.retain(|w| w.strong_count() > 0);

        if !list.iter().any(|w| same_observer(w, observer)) {
            list.push(Arc::downgrade(observer));
        }
    }

    /// Unregister an observer. Unknown paths and observers are ignored.
    pub fn unregister(&mut self, path: &str, observer: &Arc<dyn PathObserver>) {
        let Some(list) = self.observers.get_mut(path) else {
            return;
        };

        list.retain(|w| w.strong_count() > 0 && !same_observer(w, observer));
        if list.is_empty() {
            self.observers.remove(path);
        }
    }

    /// Refresh every live observer registered for `path`.
    ///
    /// Returns the number of observers that were refreshed.
    pub fn notify(&mut self, path: &str) -> usize {
        let live = self.observers_for(path);
        for observer in &live {
            observer.refresh();
        }

        crate::debug_event!("watchers", "notified", "{} for {path}", live.len());
        live.len()
    }

    /// Live observers registered for `path`, pruning dead ones.
    pub fn observers_for(&mut self, path: &str) -> Vec<Arc<dyn PathObserver>> {
        let Some(list) = self.observers.get_mut(path) else {
            return Vec::new();
        };

        let live: Vec<Arc<dyn PathObserver>> = list.iter().filter_map(Weak::upgrade).collect();
        list.retain(|w| w.strong_count() > 0);
        if list.is_empty() {
            self.observers.remove(path);
        }
        live
    }

    /// Number of live observers for a path.
    pub fn observer_count(&self, path: &str) -> usize {
        self.observers
            .get(path)
            .map(|list| list.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Drop every expired registration.
    pub fn prune(&mut self) {
        self.observers.retain(|_, list| {
            list.retain(|w| w.strong_count() > 0);
            !list.is_empty()
        });
    }

    /// Number of paths with at least one registration.
    pub fn path_count(&self) -> usize {
        self.observers.len()
    }

    /// Every path with at least one registration.
    pub fn paths(&self) -> Vec<String> {
        self.observers.keys().cloned().collect()
    }
}
