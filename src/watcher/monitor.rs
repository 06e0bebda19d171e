//! JSON document monitor.
//!
//! Owns one document on disk, reads and writes it as JSON and reports when
//! another process changed it. Writes made through the monitor never count as
//! external changes: the monitor pauses itself around its own writes and
//! remembers the digest of what it wrote.

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, unbounded};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::WatchError;
use crate::error::{PlacesError, PlacesResult};

/// Whether a freshly reset monitor starts watching immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStart {
    Watching,
    InitiallyPaused,
}

type DocumentDigest = [u8; 32];

fn digest_of(bytes: &[u8]) -> DocumentDigest {
    Sha256::digest(bytes).into()
}

/// Watches a single JSON document for external modifications.
#[derive(Default)]
pub struct ConfigFileMonitor {
    file: Option<PathBuf>,
    /// Kept alive for as long as the monitor watches `file`.
    _watcher: Option<RecommendedWatcher>,
    events: Option<Receiver<notify::Result<Event>>>,
    pause_depth: usize,
    last_digest: Option<DocumentDigest>,
}

impl ConfigFileMonitor {
    /// Create a monitor that is not yet attached to a file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the monitor to `file`, replacing any previous file.
    ///
    /// The parent directory is watched rather than the file itself so that
    /// atomic replace-by-rename writes from other processes are seen. A
    /// watcher that cannot be created only disables change events; reading
    /// and writing keep working.
    pub fn reset(&mut self, file: impl Into<PathBuf>, start: MonitorStart) {
        let file = file.into();
        self.pause_depth = usize::from(start == MonitorStart::InitiallyPaused);
        self.last_digest = current_digest(&file);

        match watch_parent(&file) {
            Ok((watcher, rx)) => {
                self._watcher = Some(watcher);
                self.events = Some(rx);
            }
            Err(e) => {
                tracing::warn!("[monitor] change events disabled for {}: {e}", file.display());
                self._watcher = None;
                self.events = None;
            }
        }

        self.file = Some(file);
    }

    /// The monitored file, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether the monitored file currently exists.
    pub fn exists(&self) -> bool {
        self.file.as_deref().is_some_and(Path::exists)
    }

    /// Stop reporting changes until the matching [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.pause_depth += 1;
    }

    /// Resume reporting changes. Anything that happened while paused is
    /// treated as already known.
    pub fn resume(&mut self) {
        if self.pause_depth == 0 {
            return;
        }

        self.pause_depth -= 1;
        if self.pause_depth == 0 {
            self.drain_events();
            self.last_digest = self.file.as_deref().and_then(current_digest);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_depth > 0
    }

    /// Read the raw document text. Missing or unreadable files read as empty.
    pub fn read_file(&self) -> String {
        self.file
            .as_deref()
            .and_then(|f| std::fs::read_to_string(f).ok())
            .unwrap_or_default()
    }

    /// Read and parse the document.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_json(&mut self) -> PlacesResult<Option<Value>> {
        let file = self.file.clone().ok_or(PlacesError::NoFile)?;

        let content = match std::fs::read(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        self.last_digest = Some(digest_of(&content));
        let value = serde_json::from_slice(&content).map_err(|e| PlacesError::InvalidDocument {
            path: file.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(value))
    }

    /// Serialize `value` and replace the document with it.
    ///
    /// The new content is written to a sibling temporary file and renamed
    /// over the document, so readers never observe a half-written file.
    pub fn write_json(&mut self, value: &Value) -> PlacesResult<()> {
        let file = self.file.clone().ok_or(PlacesError::NoFile)?;
        let mut content = serde_json::to_vec_pretty(value)?;
        content.push(b'\n');

        self.pause();
        let result = write_atomically(&file, &content);
        self.resume();
        result?;

        self.last_digest = Some(digest_of(&content));
        crate::debug_event!("monitor", "written", "{}", file.display());
        Ok(())
    }

    /// Drain pending file events and report whether the document was changed
    /// by someone else since it was last read or written.
    pub fn poll_changes(&mut self) -> bool {
        let saw_event = self.drain_events();
        if !saw_event || self.is_paused() {
            return false;
        }
        self.check_for_changes()
    }

    /// Compare the document on disk against the last known content,
    /// regardless of file events.
    pub fn check_for_changes(&mut self) -> bool {
        if self.is_paused() {
            return false;
        }

        let Some(file) = self.file.as_deref() else {
            return false;
        };

        let digest = current_digest(file);
        if digest == self.last_digest {
            return false;
        }

        self.last_digest = digest;
        crate::debug_event!("monitor", "external change", "{}", file.display());
        true
    }

    /// Returns true if any drained event touched the monitored file.
    fn drain_events(&mut self) -> bool {
        let (Some(rx), Some(file)) = (self.events.as_ref(), self.file.as_deref()) else {
            return false;
        };

        let mut relevant = false;
        for res in rx.try_iter() {
            match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        continue;
                    }
                    if event.paths.iter().any(|p| p == file) {
                        relevant = true;
                    }
                }
                Err(e) => {
                    let error = WatchError::EventError {
                        details: e.to_string(),
                    };
                    tracing::warn!("[monitor] {error}");
                }
            }
        }
        relevant
    }
}

fn current_digest(file: &Path) -> Option<DocumentDigest> {
    std::fs::read(file).ok().map(|content| digest_of(&content))
}

fn watch_parent(
    file: &Path,
) -> Result<(RecommendedWatcher, Receiver<notify::Result<Event>>), WatchError> {
    let parent = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    std::fs::create_dir_all(parent).map_err(|e| WatchError::PathWatchFailed {
        path: parent.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (tx, rx) = unbounded();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })?;

    watcher
        .watch(parent, RecursiveMode::NonRecursive)
        .map_err(|e| WatchError::PathWatchFailed {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok((watcher, rx))
}

fn write_atomically(file: &Path, content: &[u8]) -> PlacesResult<()> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = file.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = file.with_file_name(tmp_name);

    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn monitor_in(dir: &TempDir) -> ConfigFileMonitor {
        let mut monitor = ConfigFileMonitor::new();
        monitor.reset(dir.path().join("doc.json"), MonitorStart::Watching);
        monitor
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let mut monitor = monitor_in(&dir);

        assert!(!monitor.exists());
        assert!(monitor.read_json().unwrap().is_none());
        assert_eq!(monitor.read_file(), "");
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut monitor = monitor_in(&dir);

        let doc = json!([{"name": "Music", "path": "/home/user/Music"}]);
        monitor.write_json(&doc).unwrap();

        assert!(monitor.exists());
        assert_eq!(monitor.read_json().unwrap(), Some(doc));
        assert!(!dir.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn test_own_writes_are_not_external_changes() {
        let dir = TempDir::new().unwrap();
        let mut monitor = monitor_in(&dir);

        monitor.write_json(&json!([])).unwrap();
        assert!(!monitor.check_for_changes());
        assert!(!monitor.poll_changes());
    }

    #[test]
    fn test_foreign_write_is_detected_once() {
        let dir = TempDir::new().unwrap();
        let mut monitor = monitor_in(&dir);
        monitor.write_json(&json!([])).unwrap();

        std::fs::write(dir.path().join("doc.json"), "[{\"path\": \"/x\"}]").unwrap();

        assert!(monitor.check_for_changes());
        assert!(!monitor.check_for_changes());
    }

    #[test]
    fn test_paused_monitor_ignores_changes() {
        let dir = TempDir::new().unwrap();
        let mut monitor = ConfigFileMonitor::new();
        monitor.reset(dir.path().join("doc.json"), MonitorStart::InitiallyPaused);
        assert!(monitor.is_paused());

        std::fs::write(dir.path().join("doc.json"), "[]").unwrap();
        assert!(!monitor.check_for_changes());

        monitor.resume();
        assert!(!monitor.is_paused());
        // Changes made while paused count as known
        assert!(!monitor.check_for_changes());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut monitor = monitor_in(&dir);
        std::fs::write(dir.path().join("doc.json"), "{not json").unwrap();

        let err = monitor.read_json().unwrap_err();
        assert!(matches!(err, PlacesError::InvalidDocument { .. }));
    }

    #[test]
    fn test_unattached_monitor() {
        let mut monitor = ConfigFileMonitor::new();
        assert!(monitor.file().is_none());
        assert!(matches!(monitor.read_json(), Err(PlacesError::NoFile)));
        assert!(!monitor.check_for_changes());
    }
}
