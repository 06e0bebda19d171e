//! One-shot move of bookmarks from the global settings file to their own
//! document.
//!
//! Older versions kept the ordered list of paths as a JSON array under
//! `Bookmarks/Entries` and each name under `Bookmarks/<path>`. Legacy keys
//! are removed only after the new document was written.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::types::{BookmarkRecord, default_bookmark_name};
use crate::error::{PlacesError, PlacesResult};
use crate::settings::RawSettings;
use crate::watcher::{ConfigFileMonitor, MonitorStart};

const LEGACY_ENTRIES_KEY: &str = "Bookmarks/Entries";
const LEGACY_GROUP: &str = "Bookmarks";

/// Outcome of a migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The bookmarks document already exists.
    NotNeeded,
    /// This many bookmarks were moved to the new document.
    Migrated(usize),
}

/// Migrate legacy bookmarks into `bookmarks_file` unless it already exists.
pub fn migrate_bookmarks(raw: &RawSettings, bookmarks_file: &Path) -> PlacesResult<MigrationOutcome> {
    if bookmarks_file.exists() {
        return Ok(MigrationOutcome::NotNeeded);
    }

    crate::log_event!(
        "migrate",
        "migrating bookmarks from old config location",
        "{}",
        bookmarks_file.display()
    );

    let stored = raw.read(LEGACY_ENTRIES_KEY, "[]", None);
    let paths: Vec<String> = match serde_json::from_str::<serde_json::Value>(&stored) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => {
            tracing::warn!("[migrate] ignoring invalid legacy bookmark list: {stored}");
            Vec::new()
        }
    };

    let records: Vec<BookmarkRecord> = paths
        .iter()
        .map(|path| BookmarkRecord {
            name: raw.read(&legacy_name_key(path), &default_bookmark_name(path), None),
            path: path.clone(),
        })
        .collect();

    let mut out = ConfigFileMonitor::new();
    out.reset(bookmarks_file, MonitorStart::InitiallyPaused);
    let document = serde_json::to_value(&records)?;
    if let Err(e) = out.write_json(&document) {
        tracing::warn!(
            "[migrate] failed to migrate bookmarks to new location at {}: {e}",
            bookmarks_file.display()
        );
        return Err(e);
    }

    crate::log_event!("migrate", "removing bookmarks from old location");
    for path in &paths {
        raw.remove(&legacy_name_key(path), None);
    }
    raw.remove(LEGACY_ENTRIES_KEY, None);

    crate::log_event!("migrate", "bookmarks successfully migrated", "{}", records.len());
    Ok(MigrationOutcome::Migrated(records.len()))
}

/// Run [`migrate_bookmarks`] on a background thread.
pub fn spawn_migration(
    raw: Arc<RawSettings>,
    bookmarks_file: PathBuf,
) -> PlacesResult<JoinHandle<PlacesResult<MigrationOutcome>>> {
    std::thread::Builder::new()
        .name("bookmark-migration".to_string())
        .spawn(move || migrate_bookmarks(&raw, &bookmarks_file))
        .map_err(PlacesError::from)
}

fn legacy_name_key(path: &str) -> String {
    format!("{LEGACY_GROUP}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn raw(dir: &TempDir) -> RawSettings {
        RawSettings::new(
            dir.path().join("settings.toml"),
            vec![dir.path().to_path_buf()],
        )
    }

    #[test]
    fn test_migrates_and_removes_legacy_keys() {
        let dir = TempDir::new().unwrap();
        let raw = raw(&dir);
        raw.write(LEGACY_ENTRIES_KEY, r#"["/home/user/Music", "/srv/share"]"#, None);
        raw.write("Bookmarks//home/user/Music", "Tunes", None);

        let file = dir.path().join("bookmarks.json");
        assert_eq!(migrate_bookmarks(&raw, &file).unwrap(), MigrationOutcome::Migrated(2));

        let records: Vec<BookmarkRecord> =
            serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(
            records,
            vec![
                BookmarkRecord {
                    name: "Tunes".to_string(),
                    path: "/home/user/Music".to_string()
                },
                BookmarkRecord {
                    name: "share".to_string(),
                    path: "/srv/share".to_string()
                },
            ]
        );
        assert!(!raw.has_key(LEGACY_ENTRIES_KEY, None));
        assert!(raw.keys(Some(LEGACY_GROUP), None).is_empty());
    }

    #[test]
    fn test_existing_document_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let raw = raw(&dir);
        raw.write(LEGACY_ENTRIES_KEY, r#"["/srv"]"#, None);
        let file = dir.path().join("bookmarks.json");
        std::fs::write(&file, "[]").unwrap();

        assert_eq!(migrate_bookmarks(&raw, &file).unwrap(), MigrationOutcome::NotNeeded);
        assert!(raw.has_key(LEGACY_ENTRIES_KEY, None));
    }

    #[test]
    fn test_background_migration_without_legacy_data() {
        let dir = TempDir::new().unwrap();
        let raw = Arc::new(raw(&dir));
        let file = dir.path().join("bookmarks.json");

        let handle = spawn_migration(raw, file.clone()).unwrap();
        assert_eq!(handle.join().unwrap().unwrap(), MigrationOutcome::Migrated(0));
        assert_eq!(std::fs::read_to_string(&file).unwrap().trim(), "[]");
    }
}
