//! Documented settings.
//!
//! Every setting has a global key with its valid values. Settings that can be
//! overridden per directory also name the key used in the directory's local
//! file, with its own valid values. Invalid stored values read as the
//! global default.

use std::sync::LazyLock;

use super::mapping::{Mapping, SettingValue};
use super::resolver::SettingsResolver;
use crate::bookmarks::GroupOrder;

/// Where a new window starts browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialDirectoryMode {
    Home,
    Last,
    Custom,
}

impl SettingValue for InitialDirectoryMode {}

/// A setting with its global key and optional per-directory key.
#[derive(Debug, Clone)]
pub struct SettingKey<T> {
    pub global: &'static str,
    pub global_map: Mapping<T>,
    pub local: Option<LocalKey<T>>,
}

#[derive(Debug, Clone)]
pub struct LocalKey<T> {
    pub key: &'static str,
    pub map: Mapping<T>,
}

impl<T: SettingValue> SettingKey<T> {
    pub fn global(key: &'static str, map: Mapping<T>) -> Self {
        Self {
            global: key,
            global_map: map,
            local: None,
        }
    }

    /// A setting whose local key uses the same values as the global one.
    pub fn layered(key: &'static str, local_key: &'static str, map: Mapping<T>) -> Self {
        Self::layered_with(key, map.clone(), local_key, map)
    }

    pub fn layered_with(
        key: &'static str,
        map: Mapping<T>,
        local_key: &'static str,
        local_map: Mapping<T>,
    ) -> Self {
        Self {
            global: key,
            global_map: map,
            local: Some(LocalKey {
                key: local_key,
                map: local_map,
            }),
        }
    }

    pub fn local_key(&self) -> &'static str {
        self.local.as_ref().map_or("", |local| local.key)
    }

    pub fn default_value(&self) -> T {
        self.global_map.default_value()
    }
}

// [General]
pub static GENERAL_DEFAULT_FILTER_ACTION: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::global(
        "General/DefaultFilterAction",
        Mapping::choices("filter", &["search"]),
    )
});
pub static GENERAL_SHOW_FULL_DIRECTORY_PATHS: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::global("General/ShowFullDirectoryPaths", Mapping::flag(false))
});
pub static GENERAL_SHOW_NAVIGATION_MENU_ICON: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::global("General/ShowNavigationMenuIcon", Mapping::flag(true))
});
pub static GENERAL_FILENAME_ELIDE_MODE: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::global(
        "General/FilenameElideMode",
        Mapping::choices("fade", &["end", "middle"]),
    )
});
pub static GENERAL_SOLID_WINDOW_BACKGROUND: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::global("General/SolidWindowBackground", Mapping::flag(false))
});
pub static GENERAL_INITIAL_DIRECTORY_MODE: LazyLock<SettingKey<InitialDirectoryMode>> =
    LazyLock::new(|| {
        SettingKey::global(
            "General/InitialDirectoryMode",
            Mapping::closed(
                ("home", InitialDirectoryMode::Home),
                [
                    ("last", InitialDirectoryMode::Last),
                    ("custom", InitialDirectoryMode::Custom),
                ],
            ),
        )
    });
pub static GENERAL_CUSTOM_INITIAL_DIRECTORY_PATH: LazyLock<SettingKey<String>> =
    LazyLock::new(|| {
        SettingKey::global(
            "General/CustomInitialDirectoryPath",
            Mapping::free_form(home_path()),
        )
    });
pub static GENERAL_LAST_DIRECTORY_PATH: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::global("General/LastDirectoryPath", Mapping::free_form(home_path()))
});

// [Transfer]
pub static TRANSFER_DEFAULT_ACTION: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::global(
        "Transfer/DefaultAction",
        Mapping::choices("none", &["copy", "move", "link"]),
    )
});

// [View]
pub static VIEW_SORT_ROLE: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/SortRole",
        "Dolphin/SortRole",
        Mapping::choices("name", &["size", "modificationtime", "type"]),
    )
});
pub static VIEW_SORT_ORDER: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::layered_with(
        "View/SortOrder",
        Mapping::choices("default", &["reversed"]),
        "Dolphin/SortOrder",
        Mapping::closed(
            ("0", "default".to_string()),
            [("1", "reversed".to_string())],
        ),
    )
});
pub static VIEW_SORT_CASE_SENSITIVELY: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/SortCaseSensitively",
        "Sailfish/SortCaseSensitively",
        Mapping::flag(false),
    )
});
pub static VIEW_SHOW_DIRECTORIES_FIRST: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/ShowDirectoriesFirst",
        "Dolphin/SortFoldersFirst",
        Mapping::flag(true),
    )
});
pub static VIEW_SHOW_HIDDEN_LAST: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/ShowHiddenLast",
        "Dolphin/SortHiddenLast",
        Mapping::flag(false),
    )
});
pub static VIEW_HIDDEN_FILES_SHOWN: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/HiddenFilesShown",
        "Settings/HiddenFilesShown",
        Mapping::flag(false),
    )
});
pub static VIEW_PREVIEWS_SHOWN: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/PreviewsShown",
        "Dolphin/PreviewsShown",
        Mapping::flag(false),
    )
});
pub static VIEW_PREVIEWS_SIZE: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::global(
        "View/PreviewsSize",
        Mapping::choices("medium", &["small", "large", "huge"]),
    )
});
pub static VIEW_USE_LOCAL_SETTINGS: LazyLock<SettingKey<bool>> = LazyLock::new(|| {
    SettingKey::global("View/UseLocalSettings", Mapping::flag(true))
});
pub static VIEW_VIEW_MODE: LazyLock<SettingKey<String>> = LazyLock::new(|| {
    SettingKey::layered(
        "View/ViewMode",
        "Sailfish/ViewMode",
        Mapping::choices("list", &["gallery", "grid"]),
    )
});

// [Bookmarks]
pub static BOOKMARKS_GROUP_ORDER: LazyLock<SettingKey<GroupOrder>> = LazyLock::new(|| {
    SettingKey::global("Bookmarks/GroupOrder", Mapping::free_form(GroupOrder::default()))
});

fn home_path() -> String {
    dirs::home_dir()
        .map(|home| home.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string())
}

/// A documented setting of any value type, addressed by its global key.
#[derive(Clone, Copy)]
pub enum CatalogEntry {
    Text(&'static LazyLock<SettingKey<String>>),
    Flag(&'static LazyLock<SettingKey<bool>>),
    InitialDirectory(&'static LazyLock<SettingKey<InitialDirectoryMode>>),
    GroupOrder(&'static LazyLock<SettingKey<GroupOrder>>),
}

pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry::Text(&GENERAL_DEFAULT_FILTER_ACTION),
    CatalogEntry::Flag(&GENERAL_SHOW_FULL_DIRECTORY_PATHS),
    CatalogEntry::Flag(&GENERAL_SHOW_NAVIGATION_MENU_ICON),
    CatalogEntry::Text(&GENERAL_FILENAME_ELIDE_MODE),
    CatalogEntry::Flag(&GENERAL_SOLID_WINDOW_BACKGROUND),
    CatalogEntry::InitialDirectory(&GENERAL_INITIAL_DIRECTORY_MODE),
    CatalogEntry::Text(&GENERAL_CUSTOM_INITIAL_DIRECTORY_PATH),
    CatalogEntry::Text(&GENERAL_LAST_DIRECTORY_PATH),
    CatalogEntry::Text(&TRANSFER_DEFAULT_ACTION),
    CatalogEntry::Text(&VIEW_SORT_ROLE),
    CatalogEntry::Text(&VIEW_SORT_ORDER),
    CatalogEntry::Flag(&VIEW_SORT_CASE_SENSITIVELY),
    CatalogEntry::Flag(&VIEW_SHOW_DIRECTORIES_FIRST),
    CatalogEntry::Flag(&VIEW_SHOW_HIDDEN_LAST),
    CatalogEntry::Flag(&VIEW_HIDDEN_FILES_SHOWN),
    CatalogEntry::Flag(&VIEW_PREVIEWS_SHOWN),
    CatalogEntry::Text(&VIEW_PREVIEWS_SIZE),
    CatalogEntry::Flag(&VIEW_USE_LOCAL_SETTINGS),
    CatalogEntry::Text(&VIEW_VIEW_MODE),
    CatalogEntry::GroupOrder(&BOOKMARKS_GROUP_ORDER),
];

/// Find a documented setting by its global key.
pub fn find(global_key: &str) -> Option<CatalogEntry> {
    CATALOG
        .iter()
        .copied()
        .find(|entry| entry.global_key() == global_key)
}

impl CatalogEntry {
    pub fn global_key(&self) -> &'static str {
        match self {
            CatalogEntry::Text(key) => key.global,
            CatalogEntry::Flag(key) => key.global,
            CatalogEntry::InitialDirectory(key) => key.global,
            CatalogEntry::GroupOrder(key) => key.global,
        }
    }

    pub fn local_key(&self) -> &'static str {
        match self {
            CatalogEntry::Text(key) => key.local_key(),
            CatalogEntry::Flag(key) => key.local_key(),
            CatalogEntry::InitialDirectory(key) => key.local_key(),
            CatalogEntry::GroupOrder(key) => key.local_key(),
        }
    }

    /// Resolved value in its global stored form.
    pub fn get_text(&self, resolver: &SettingsResolver, local_file: Option<&std::path::Path>) -> String {
        match self {
            CatalogEntry::Text(key) => resolved_text(resolver, key, local_file),
            CatalogEntry::Flag(key) => resolved_text(resolver, key, local_file),
            CatalogEntry::InitialDirectory(key) => resolved_text(resolver, key, local_file),
            CatalogEntry::GroupOrder(key) => resolved_text(resolver, key, local_file),
        }
    }

    /// Set from the global stored form. Fails on values the setting rejects.
    pub fn set_text(
        &self,
        resolver: &SettingsResolver,
        local_file: Option<&std::path::Path>,
        raw: &str,
    ) -> Result<(), String> {
        match self {
            CatalogEntry::Text(key) => set_from_text(resolver, key, local_file, raw),
            CatalogEntry::Flag(key) => set_from_text(resolver, key, local_file, raw),
            CatalogEntry::InitialDirectory(key) => set_from_text(resolver, key, local_file, raw),
            CatalogEntry::GroupOrder(key) => set_from_text(resolver, key, local_file, raw),
        }
    }
}

fn resolved_text<T: SettingValue>(
    resolver: &SettingsResolver,
    key: &SettingKey<T>,
    local_file: Option<&std::path::Path>,
) -> String {
    let value = resolver.get_setting(key, local_file);
    key.global_map
        .encode(&value)
        .unwrap_or_else(|| key.global_map.default_text())
}

fn set_from_text<T: SettingValue>(
    resolver: &SettingsResolver,
    key: &SettingKey<T>,
    local_file: Option<&std::path::Path>,
    raw: &str,
) -> Result<(), String> {
    let Some(value) = key.global_map.decode(raw) else {
        let valid = key.global_map.texts();
        return Err(if valid.is_empty() {
            format!("invalid value for {}: {raw}", key.global)
        } else {
            format!(
                "invalid value for {}: {raw} (expected one of {})",
                key.global,
                valid.join(", ")
            )
        });
    };
    resolver.set_setting(key, local_file, &value);
    Ok(())
}
