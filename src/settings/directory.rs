//! Settings seen from one directory.

use std::path::{Path, PathBuf};

use super::keys::{
    GENERAL_CUSTOM_INITIAL_DIRECTORY_PATH, GENERAL_INITIAL_DIRECTORY_MODE,
    GENERAL_LAST_DIRECTORY_PATH, InitialDirectoryMode, SettingKey,
};
use super::mapping::SettingValue;
use super::resolver::SettingsResolver;

/// Name of the per-directory settings file.
pub const LOCAL_FILE_NAME: &str = ".directory";

/// A resolver bound to one directory, or to the global settings only.
#[derive(Clone)]
pub struct DirectorySettings {
    resolver: SettingsResolver,
    path: Option<PathBuf>,
    local_file: Option<PathBuf>,
}

impl DirectorySettings {
    /// Settings of `path`, with overrides from `<path>/.directory`.
    pub fn new(resolver: SettingsResolver, path: impl Into<PathBuf>) -> Self {
        let mut settings = Self::global(resolver);
        settings.set_path(path);
        settings
    }

    /// Global settings only.
    pub fn global(resolver: SettingsResolver) -> Self {
        Self {
            resolver,
            path: None,
            local_file: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn local_file(&self) -> Option<&Path> {
        self.local_file.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.local_file = Some(path.join(LOCAL_FILE_NAME));
        self.path = Some(path);
    }

    pub fn resolver(&self) -> &SettingsResolver {
        &self.resolver
    }

    pub fn get<T: SettingValue>(&self, key: &SettingKey<T>) -> T {
        self.resolver.get_setting(key, self.local_file())
    }

    pub fn set<T: SettingValue>(&self, key: &SettingKey<T>, value: &T) {
        self.resolver.set_setting(key, self.local_file(), value)
    }

    /// Where browsing starts.
    ///
    /// A `forced` directory takes precedence over the configured mode. The
    /// home directory is used whenever the result is not an existing
    /// directory.
    pub fn initial_directory(&self, forced: Option<&Path>) -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

        let candidate = match forced {
            Some(forced) => std::path::absolute(forced).unwrap_or_else(|_| forced.to_path_buf()),
            None => match self.get(&GENERAL_INITIAL_DIRECTORY_MODE) {
                InitialDirectoryMode::Home => home.clone(),
                InitialDirectoryMode::Last => PathBuf::from(self.get(&GENERAL_LAST_DIRECTORY_PATH)),
                InitialDirectoryMode::Custom => {
                    PathBuf::from(self.get(&GENERAL_CUSTOM_INITIAL_DIRECTORY_PATH))
                }
            },
        };

        if candidate.is_dir() {
            crate::debug_event!("settings", "initial directory", "{}", candidate.display());
            candidate
        } else {
            crate::debug_event!(
                "settings",
                "initial directory missing, using home",
                "{}",
                candidate.display()
            );
            home
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::keys::{VIEW_VIEW_MODE, GENERAL_SHOW_FULL_DIRECTORY_PATHS};
    use crate::settings::raw::RawSettings;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir) -> SettingsResolver {
        SettingsResolver::new(Arc::new(RawSettings::new(
            dir.path().join("settings.toml"),
            vec![dir.path().to_path_buf()],
        )))
    }

    #[test]
    fn test_local_file_follows_path() {
        let dir = TempDir::new().unwrap();
        let mut settings = DirectorySettings::new(resolver(&dir), dir.path().join("a"));
        assert_eq!(settings.local_file(), Some(dir.path().join("a/.directory").as_path()));

        settings.set_path(dir.path().join("b"));
        assert_eq!(settings.local_file(), Some(dir.path().join("b/.directory").as_path()));
    }

    #[test]
    fn test_directory_overrides() {
        let dir = TempDir::new().unwrap();
        let music = dir.path().join("Music");
        std::fs::create_dir(&music).unwrap();

        let global = DirectorySettings::global(resolver(&dir));
        let local = DirectorySettings::new(resolver(&dir), &music);

        local.set(&VIEW_VIEW_MODE, &"gallery".to_string());
        assert_eq!(local.get(&VIEW_VIEW_MODE), "gallery");
        assert_eq!(global.get(&VIEW_VIEW_MODE), "list");
        assert!(music.join(".directory").exists());

        // Global-only settings ignore the directory
        local.set(&GENERAL_SHOW_FULL_DIRECTORY_PATHS, &true);
        assert!(global.get(&GENERAL_SHOW_FULL_DIRECTORY_PATHS));
    }

    #[test]
    fn test_initial_directory() {
        let dir = TempDir::new().unwrap();
        let settings = DirectorySettings::global(resolver(&dir));
        let custom = dir.path().join("start");
        std::fs::create_dir(&custom).unwrap();

        settings.set(&GENERAL_INITIAL_DIRECTORY_MODE, &InitialDirectoryMode::Custom);
        settings.set(
            &GENERAL_CUSTOM_INITIAL_DIRECTORY_PATH,
            &custom.to_string_lossy().into_owned(),
        );
        assert_eq!(settings.initial_directory(None), custom);

        assert_eq!(settings.initial_directory(Some(dir.path())), dir.path());

        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        assert_eq!(settings.initial_directory(Some(&dir.path().join("gone"))), home);
    }
}
