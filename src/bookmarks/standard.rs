//! Fixed standard locations shown at the top of the list.

use std::path::{Path, PathBuf};

use super::types::{
    ANDROID_ICON, BookmarkEntry, BookmarkGroup, HOME_ICON, INTERNAL_STORAGE, LocationAlternative,
    ROOT_ICON, WellKnownFolder,
};

const ANDROID_STORAGE: &str = "Android storage";

/// Resolved paths of the standard user folders.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardLocations {
    pub home: PathBuf,
    pub documents: PathBuf,
    pub downloads: PathBuf,
    pub music: PathBuf,
    pub pictures: PathBuf,
    pub videos: PathBuf,
    /// Android compatibility layer storage, below home.
    pub android: PathBuf,
}

impl StandardLocations {
    /// Detect the folders of the current user.
    pub fn detect() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self {
            documents: dirs::document_dir().unwrap_or_else(|| home.join("Documents")),
            downloads: dirs::download_dir().unwrap_or_else(|| home.join("Downloads")),
            music: dirs::audio_dir().unwrap_or_else(|| home.join("Music")),
            pictures: dirs::picture_dir().unwrap_or_else(|| home.join("Pictures")),
            videos: dirs::video_dir().unwrap_or_else(|| home.join("Videos")),
            android: home.join("android_storage"),
            home,
        }
    }

    /// Conventional folder names below `home`.
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            documents: home.join("Documents"),
            downloads: home.join("Downloads"),
            music: home.join("Music"),
            pictures: home.join("Pictures"),
            videos: home.join("Videos"),
            android: home.join("android_storage"),
            home,
        }
    }

    pub fn folder(&self, kind: WellKnownFolder) -> &Path {
        match kind {
            WellKnownFolder::Documents => &self.documents,
            WellKnownFolder::Downloads => &self.downloads,
            WellKnownFolder::Pictures => &self.pictures,
            WellKnownFolder::Videos => &self.videos,
            WellKnownFolder::Music => &self.music,
        }
    }

    pub fn has_android_storage(&self) -> bool {
        self.android.is_dir()
    }

    /// Build the location rows: home, the well-known folders, Android
    /// storage when present, and the filesystem root.
    ///
    /// When Android storage exists, well-known folders with an Android
    /// counterpart start out with two alternatives.
    pub fn entries(&self) -> Vec<BookmarkEntry> {
        let have_android = self.has_android_storage();
        let mut entries = vec![BookmarkEntry::new(
            BookmarkGroup::Location,
            "Home",
            HOME_ICON,
            path_string(&self.home),
            true,
            false,
        )];

        for kind in [
            WellKnownFolder::Documents,
            WellKnownFolder::Downloads,
            WellKnownFolder::Pictures,
            WellKnownFolder::Videos,
            WellKnownFolder::Music,
        ] {
            let mut entry = BookmarkEntry::new(
                BookmarkGroup::Location,
                kind.display_name(),
                kind.icon(),
                path_string(self.folder(kind)),
                false,
                false,
            );

            if have_android {
                let android = self.android.join(kind.android_name());
                if android.is_dir() {
                    entry.alternatives = vec![
                        LocationAlternative::new(INTERNAL_STORAGE, &entry.path, INTERNAL_STORAGE),
                        LocationAlternative::new(
                            ANDROID_STORAGE,
                            path_string(&android),
                            ANDROID_STORAGE,
                        ),
                    ];
                }
            }

            entries.push(entry);
        }

        if have_android {
            entries.push(BookmarkEntry::new(
                BookmarkGroup::Location,
                ANDROID_STORAGE,
                ANDROID_ICON,
                path_string(&self.android),
                false,
                false,
            ));
        }

        entries.push(BookmarkEntry::new(
            BookmarkGroup::Location,
            "Root",
            ROOT_ICON,
            "/",
            true,
            false,
        ));

        entries
    }
}

pub(crate) fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
