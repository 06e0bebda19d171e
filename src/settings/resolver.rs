//! Layered setting resolution: per-directory values over global ones.

use std::path::Path;
use std::sync::Arc;

use super::keys::{SettingKey, VIEW_USE_LOCAL_SETTINGS};
use super::mapping::{Mapping, SettingValue};
use super::raw::RawSettings;

/// Resolves settings against the global file and an optional local file.
///
/// Values are resolved on every read; nothing is cached beyond what
/// [`RawSettings`] keeps.
#[derive(Clone)]
pub struct SettingsResolver {
    raw: Arc<RawSettings>,
}

impl SettingsResolver {
    pub fn new(raw: Arc<RawSettings>) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawSettings {
        &self.raw
    }

    /// Shared handle to the underlying settings store.
    pub fn shared(&self) -> Arc<RawSettings> {
        Arc::clone(&self.raw)
    }

    /// The global switch for per-directory settings.
    pub fn use_local_settings(&self) -> bool {
        self.global_value(VIEW_USE_LOCAL_SETTINGS.global, &VIEW_USE_LOCAL_SETTINGS.global_map)
    }

    fn local_applies(&self, local_key: &str, local_file: Option<&Path>) -> bool {
        local_file.is_some() && !local_key.is_empty() && self.use_local_settings()
    }

    /// Value of the global key, or the mapping's default when the key is
    /// missing or holds an invalid value.
    pub fn global_value<T: SettingValue>(&self, global_key: &str, global_map: &Mapping<T>) -> T {
        self.raw
            .read_opt(global_key, None)
            .and_then(|raw| global_map.decode(&raw))
            .unwrap_or_else(|| global_map.default_value())
    }

    /// Resolve a setting.
    ///
    /// The local value wins when local settings are enabled, the setting has
    /// a local key and `local_file` stores a value for it. Invalid local
    /// values read as the global default.
    pub fn get<T: SettingValue>(
        &self,
        global_key: &str,
        local_key: &str,
        global_map: &Mapping<T>,
        local_map: &Mapping<T>,
        local_file: Option<&Path>,
    ) -> T {
        if self.local_applies(local_key, local_file) {
            if let Some(raw) = self.raw.read_opt(local_key, local_file) {
                return local_map
                    .decode(&raw)
                    .unwrap_or_else(|| global_map.default_value());
            }
        }

        self.global_value(global_key, global_map)
    }

    /// Store a setting.
    ///
    /// When local settings apply, a value equal to the current global value
    /// removes the local override instead of pinning it, so later global
    /// changes still reach this directory. Without local settings the global
    /// key is written as is.
    pub fn set<T: SettingValue>(
        &self,
        global_key: &str,
        local_key: &str,
        global_map: &Mapping<T>,
        local_map: &Mapping<T>,
        local_file: Option<&Path>,
        new_value: &T,
    ) {
        if self.local_applies(local_key, local_file) {
            if *new_value == self.global_value(global_key, global_map) {
                self.raw.remove(local_key, local_file);
            } else {
                match local_map.encode(new_value) {
                    Some(text) => self.raw.write(local_key, &text, local_file),
                    None => tracing::warn!("[settings] cannot store {new_value:?} as {local_key}"),
                }
            }
            return;
        }

        match global_map.encode(new_value) {
            Some(text) => self.raw.write(global_key, &text, None),
            None => tracing::warn!("[settings] cannot store {new_value:?} as {global_key}"),
        }
    }

    pub fn get_setting<T: SettingValue>(&self, key: &SettingKey<T>, local_file: Option<&Path>) -> T {
        match &key.local {
            Some(local) => self.get(key.global, local.key, &key.global_map, &local.map, local_file),
            None => self.global_value(key.global, &key.global_map),
        }
    }

    pub fn set_setting<T: SettingValue>(
        &self,
        key: &SettingKey<T>,
        local_file: Option<&Path>,
        new_value: &T,
    ) {
        match &key.local {
            Some(local) => self.set(
                key.global,
                local.key,
                &key.global_map,
                &local.map,
                local_file,
                new_value,
            ),
            None => self.set(
                key.global,
                "",
                &key.global_map,
                &key.global_map,
                None,
                new_value,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::keys::{VIEW_HIDDEN_FILES_SHOWN, VIEW_SORT_ORDER, VIEW_SORT_ROLE};
    use tempfile::TempDir;

    fn resolver(dir: &TempDir) -> SettingsResolver {
        SettingsResolver::new(Arc::new(RawSettings::new(
            dir.path().join("settings.toml"),
            vec![dir.path().to_path_buf()],
        )))
    }

    #[test]
    fn test_local_value_wins() {
        let dir = TempDir::new().unwrap();
        let settings = resolver(&dir);
        let local = dir.path().join(".directory");

        settings.raw().write("View/SortRole", "size", None);
        settings.raw().write("Dolphin/SortRole", "type", Some(&local));

        assert_eq!(settings.get_setting(&VIEW_SORT_ROLE, Some(&local)), "type");
        assert_eq!(settings.get_setting(&VIEW_SORT_ROLE, None), "size");
    }

    #[test]
    fn test_local_settings_disabled() {
        let dir = TempDir::new().unwrap();
        let settings = resolver(&dir);
        let local = dir.path().join(".directory");

        settings.raw().write("Dolphin/SortRole", "type", Some(&local));
        settings.raw().write("View/UseLocalSettings", "false", None);

        assert_eq!(settings.get_setting(&VIEW_SORT_ROLE, Some(&local)), "name");

        settings.set_setting(&VIEW_SORT_ROLE, Some(&local), &"size".to_string());
        assert_eq!(settings.raw().read_opt("View/SortRole", None).as_deref(), Some("size"));
        assert_eq!(
            settings.raw().read_opt("Dolphin/SortRole", Some(&local)).as_deref(),
            Some("type")
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_default() {
        let dir = TempDir::new().unwrap();
        let settings = resolver(&dir);
        let local = dir.path().join(".directory");

        settings.raw().write("View/SortRole", "color", None);
        assert_eq!(settings.get_setting(&VIEW_SORT_ROLE, None), "name");

        settings.raw().write("View/SortRole", "size", None);
        settings.raw().write("Dolphin/SortRole", "color", Some(&local));
        // Invalid local values use the global default, not the global value
        assert_eq!(settings.get_setting(&VIEW_SORT_ROLE, Some(&local)), "name");
    }

    #[test]
    fn test_matching_global_removes_override() {
        let dir = TempDir::new().unwrap();
        let settings = resolver(&dir);
        let local = dir.path().join(".directory");

        settings.set_setting(&VIEW_HIDDEN_FILES_SHOWN, Some(&local), &true);
        assert_eq!(
            settings.raw().read_opt("Settings/HiddenFilesShown", Some(&local)).as_deref(),
            Some("true")
        );

        settings.set_setting(&VIEW_HIDDEN_FILES_SHOWN, Some(&local), &false);
        assert!(!settings.raw().has_key("Settings/HiddenFilesShown", Some(&local)));
        assert!(!settings.get_setting(&VIEW_HIDDEN_FILES_SHOWN, Some(&local)));

        // Later global changes reach the directory again
        settings.set_setting(&VIEW_HIDDEN_FILES_SHOWN, None, &true);
        assert!(settings.get_setting(&VIEW_HIDDEN_FILES_SHOWN, Some(&local)));
    }

    #[test]
    fn test_local_encoding_differs() {
        let dir = TempDir::new().unwrap();
        let settings = resolver(&dir);
        let local = dir.path().join(".directory");

        settings.set_setting(&VIEW_SORT_ORDER, Some(&local), &"reversed".to_string());
        assert_eq!(
            settings.raw().read_opt("Dolphin/SortOrder", Some(&local)).as_deref(),
            Some("1")
        );
        assert_eq!(settings.get_setting(&VIEW_SORT_ORDER, Some(&local)), "reversed");
        assert_eq!(settings.get_setting(&VIEW_SORT_ORDER, None), "default");
    }
}
