//! Raw key/value settings files.
//!
//! Keys have the form `Section/Name` and live in the TOML table `Section`
//! under `Name`; everything after the first `/` is the name, so paths can be
//! used as names. Keys without a section live at the top level. Values are
//! read back as strings whatever their TOML type.
//!
//! Files outside the writable roots, and files that cannot be written, are
//! never touched: their values are shadowed in memory and flushed to disk on
//! a later access once the file can be written.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use toml::{Table, Value};

use crate::error::PlacesResult;

/// A settings value changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    /// `key` changed in `local_file`, or in the global file when `None`.
    Changed {
        key: String,
        local_file: Option<PathBuf>,
    },
}

/// Pending values per key; `None` marks a removal.
type ShadowEntries = BTreeMap<String, Option<String>>;

pub struct RawSettings {
    global_file: PathBuf,
    writable_roots: Vec<PathBuf>,
    shadow: Mutex<HashMap<PathBuf, ShadowEntries>>,
    events: broadcast::Sender<SettingsEvent>,
}

impl RawSettings {
    pub fn new(global_file: impl Into<PathBuf>, writable_roots: Vec<PathBuf>) -> Self {
        let global_file = absolute(&global_file.into());
        let (events, _) = broadcast::channel(64);
        let settings = Self {
            global_file,
            writable_roots: writable_roots.iter().map(|r| absolute(r)).collect(),
            shadow: Mutex::new(HashMap::new()),
            events,
        };

        if settings.path_is_protected(&settings.global_file) {
            tracing::warn!(
                "[settings] cannot save global settings: {} is protected",
                settings.global_file.display()
            );
        }
        settings
    }

    pub fn global_file(&self) -> &Path {
        &self.global_file
    }

    /// Directory of the global settings file.
    pub fn config_dir(&self) -> &Path {
        self.global_file.parent().unwrap_or(Path::new("/"))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.events.subscribe()
    }

    /// A path is protected unless it lies below one of the writable roots.
    pub fn path_is_protected(&self, path: &Path) -> bool {
        let path = absolute(path);
        !self.writable_roots.iter().any(|root| path.starts_with(root))
    }

    /// Read `key` from `file` (the global file when `None`).
    pub fn read(&self, key: &str, default: &str, file: Option<&Path>) -> String {
        self.read_opt(key, file).unwrap_or_else(|| default.to_string())
    }

    /// Read `key`, `None` when it is not set.
    pub fn read_opt(&self, key: &str, file: Option<&Path>) -> Option<String> {
        let target = self.target(file);
        let protected = self.path_is_protected(&target);
        if !protected {
            self.flush(&target);
        }

        let shadowed = self
            .shadow
            .lock()
            .get(&target)
            .and_then(|entries| entries.get(key).cloned());
        if let Some(value) = shadowed {
            return value;
        }
        if protected {
            return None;
        }

        match load_table(&target) {
            Ok(table) => lookup(&table, key),
            Err(e) => {
                tracing::warn!("[settings] cannot read {}: {e}", target.display());
                None
            }
        }
    }

    pub fn has_key(&self, key: &str, file: Option<&Path>) -> bool {
        self.read_opt(key, file).is_some()
    }

    /// Write `key`. Writing the value that is already stored does nothing.
    pub fn write(&self, key: &str, value: &str, file: Option<&Path>) {
        if self.read_opt(key, file).as_deref() == Some(value) {
            return;
        }

        let target = self.target(file);
        crate::debug_event!("settings", "write", "{key} = {value} in {}", target.display());
        self.apply(&target, key, Some(value.to_string()));
        self.announce(key, file);
    }

    /// Remove `key`. Removing a missing key does nothing.
    pub fn remove(&self, key: &str, file: Option<&Path>) {
        if !self.has_key(key, file) {
            return;
        }

        let target = self.target(file);
        crate::debug_event!("settings", "remove", "{key} in {}", target.display());
        self.apply(&target, key, None);
        self.announce(key, file);
    }

    /// Keys of `group` (relative names), or all keys when `group` is `None`.
    pub fn keys(&self, group: Option<&str>, file: Option<&Path>) -> Vec<String> {
        let target = self.target(file);
        let protected = self.path_is_protected(&target);
        if !protected {
            self.flush(&target);
        }

        let mut all: Vec<String> = if protected {
            Vec::new()
        } else {
            load_table(&target)
                .map(|table| flatten_keys(&table))
                .unwrap_or_default()
        };

        if let Some(entries) = self.shadow.lock().get(&target) {
            for (key, value) in entries {
                match value {
                    Some(_) if !all.contains(key) => all.push(key.clone()),
                    None => all.retain(|k| k != key),
                    _ => {}
                }
            }
        }

        match group {
            Some(group) => {
                let prefix = format!("{group}/");
                all.into_iter()
                    .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => all,
        }
    }

    fn target(&self, file: Option<&Path>) -> PathBuf {
        file.map(absolute)
            .unwrap_or_else(|| self.global_file.clone())
    }

    fn announce(&self, key: &str, file: Option<&Path>) {
        let _ = self.events.send(SettingsEvent::Changed {
            key: key.to_string(),
            local_file: file.map(absolute),
        });
    }

    /// Store a change on disk, or in the shadow when that is not possible.
    fn apply(&self, target: &Path, key: &str, value: Option<String>) {
        if !self.path_is_protected(target) {
            let written = load_table(target).and_then(|mut table| {
                set_in(&mut table, key, value.as_deref());
                save_table(target, &table)
            });
            match written {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(
                        "[settings] cannot write {}, keeping {key} in memory: {e}",
                        target.display()
                    );
                }
            }
        }

        self.shadow
            .lock()
            .entry(target.to_path_buf())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Move shadowed values of `target` to disk if it can be written now.
    fn flush(&self, target: &Path) {
        let pending = {
            let shadow = self.shadow.lock();
            match shadow.get(target) {
                Some(entries) if !entries.is_empty() => entries.clone(),
                _ => return,
            }
        };

        let flushed = load_table(target).and_then(|mut table| {
            for (key, value) in &pending {
                set_in(&mut table, key, value.as_deref());
            }
            save_table(target, &table)
        });

        if flushed.is_ok() {
            crate::debug_event!(
                "settings",
                "flushed",
                "{} values to {}",
                pending.len(),
                target.display()
            );
            self.shadow.lock().remove(target);
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('/') {
        Some((section, name)) if !section.is_empty() => (Some(section), name),
        _ => (None, key),
    }
}

fn value_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

fn lookup(table: &Table, key: &str) -> Option<String> {
    match split_key(key) {
        (Some(section), name) => table
            .get(section)
            .and_then(Value::as_table)
            .and_then(|inner| inner.get(name))
            .and_then(value_string),
        (None, name) => table.get(name).and_then(value_string),
    }
}

fn set_in(table: &mut Table, key: &str, value: Option<&str>) {
    match split_key(key) {
        (Some(section), name) => {
            match value {
                Some(value) => {
                    if !table.get(section).is_some_and(Value::is_table) {
                        table.insert(section.to_string(), Value::Table(Table::new()));
                    }
                    if let Some(Value::Table(inner)) = table.get_mut(section) {
                        inner.insert(name.to_string(), Value::String(value.to_string()));
                    }
                }
                None => {
                    let now_empty = match table.get_mut(section) {
                        Some(Value::Table(inner)) => {
                            inner.remove(name);
                            inner.is_empty()
                        }
                        _ => false,
                    };
                    if now_empty {
                        table.remove(section);
                    }
                }
            }
        }
        (None, name) => match value {
            Some(value) => {
                table.insert(name.to_string(), Value::String(value.to_string()));
            }
            None => {
                table.remove(name);
            }
        },
    }
}

fn flatten_keys(table: &Table) -> Vec<String> {
    let mut keys = Vec::new();
    for (name, value) in table {
        match value {
            Value::Table(inner) => {
                keys.extend(inner.keys().map(|inner_name| format!("{name}/{inner_name}")))
            }
            _ => keys.push(name.clone()),
        }
    }
    keys
}

fn load_table(file: &Path) -> PlacesResult<Table> {
    if !file.exists() {
        return Ok(Table::new());
    }
    let content = std::fs::read_to_string(file)?;
    Ok(toml::from_str(&content)?)
}

fn save_table(file: &Path, table: &Table) -> PlacesResult<()> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(table)?;
    std::fs::write(file, content)?;
    Ok(())
}
