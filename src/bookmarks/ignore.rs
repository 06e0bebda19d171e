//! Mount points that never show up as external devices.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::watcher::ConfigFileMonitor;

/// All mount points that exactly match one of these paths are ignored.
const DEFAULT_FULL_PATHS: &[&str] = &[
    "/",
    "/persist",
    "/protect_s",
    "/protect_f",
    "/dsp",
    "/odm",
    "/opt",
    "/home",
    "/firmware",
    "/bt_firmware",
    "/firmware_mnt",
    "/metadata",
    "/mnt/vendor/persist",
];

/// All mount points below these paths are ignored.
const DEFAULT_BASE_PATHS: &[&str] = &[
    "/opt/alien/",
    "/apex/",
    "/opt/appsupport/",
    "/vendor/",
    "/home/",
    "/dsp/",
    "/firmware/",
    "/bt_firmware/",
    "/firmware_mnt/",
    "/persist/",
];

/// On-disk shape of the ignore list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreDocument {
    #[serde(default)]
    pub full_paths: Vec<String>,
    #[serde(default)]
    pub base_paths: Vec<String>,
}

impl Default for IgnoreDocument {
    fn default() -> Self {
        Self {
            full_paths: DEFAULT_FULL_PATHS.iter().map(|s| s.to_string()).collect(),
            base_paths: DEFAULT_BASE_PATHS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Exact paths and path prefixes to skip during mount reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnoreList {
    full_paths: HashSet<String>,
    /// Normalized to end in exactly one `/`.
    base_paths: Vec<String>,
}

impl IgnoreList {
    pub fn from_document(document: &IgnoreDocument) -> Self {
        let full_paths = document.full_paths.iter().cloned().collect();

        let mut base_paths: Vec<String> = Vec::new();
        for base in &document.base_paths {
            let trimmed = base.trim_end_matches('/');
            if trimmed.is_empty() {
                continue;
            }
            let normalized = format!("{trimmed}/");
            if !base_paths.contains(&normalized) {
                base_paths.push(normalized);
            }
        }

        Self {
            full_paths,
            base_paths,
        }
    }

    pub fn is_exact(&self, root: &str) -> bool {
        self.full_paths.contains(root)
    }

    pub fn is_below_base(&self, root: &str) -> bool {
        self.base_paths.iter().any(|base| root.starts_with(base.as_str()))
    }

    pub fn is_ignored(&self, root: &str) -> bool {
        self.is_exact(root) || self.is_below_base(root)
    }

    pub fn base_paths(&self) -> &[String] {
        &self.base_paths
    }

    /// Load the list through `monitor`, writing the built-in defaults first
    /// if the document does not exist yet.
    ///
    /// Returns `None` if the document is unreadable or malformed; callers
    /// keep their previous list in that case.
    pub fn load(monitor: &mut ConfigFileMonitor) -> Option<Self> {
        let file = monitor.file()?.display().to_string();

        if !monitor.exists() {
            crate::log_event!("mounts", "writing default ignore list", "{file}");
            let defaults = IgnoreDocument::default();
            let written = serde_json::to_value(&defaults)
                .map_err(crate::error::PlacesError::from)
                .and_then(|value| monitor.write_json(&value));
            if let Err(e) = written {
                tracing::warn!("[mounts] failed to save default ignore list to {file}: {e}");
                return Some(Self::from_document(&defaults));
            }
        }

        let value = match monitor.read_json() {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::warn!("[mounts] ignore list vanished: {file}");
                return None;
            }
            Err(e) => {
                tracing::warn!("[mounts] invalid mount point ignore data in {file}: {e}");
                return None;
            }
        };

        if !value.is_object() {
            tracing::warn!("[mounts] invalid mount point ignore data in {file}: expected an object");
            return None;
        }

        match serde_json::from_value::<IgnoreDocument>(value) {
            Ok(document) => {
                crate::debug_event!(
                    "mounts",
                    "ignore list loaded",
                    "{} full paths, {} base paths",
                    document.full_paths.len(),
                    document.base_paths.len()
                );
                Some(Self::from_document(&document))
            }
            Err(e) => {
                tracing::warn!("[mounts] invalid mount point ignore data in {file}: {e}");
                None
            }
        }
    }
}
