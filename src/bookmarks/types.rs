//! Core bookmark types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Icons of the standard locations double as their identity: the alternate
// resolver recognizes well-known folders by icon, so each must be unique.
pub const HOME_ICON: &str = "icon-m-home";
pub const DOCUMENTS_ICON: &str = "icon-m-file-document-light";
pub const DOWNLOADS_ICON: &str = "icon-m-cloud-download";
pub const MUSIC_ICON: &str = "icon-m-file-audio";
pub const PICTURES_ICON: &str = "icon-m-file-image";
pub const VIDEOS_ICON: &str = "icon-m-file-video";
pub const ANDROID_ICON: &str = "icon-m-file-apk";
pub const ROOT_ICON: &str = "icon-m-file-rpm";
pub const BOOKMARK_ICON: &str = "icon-m-favorite";
pub const TEMPORARY_ICON: &str = "icon-m-file-folder";

/// Display name of the synthesized alternative pointing at internal storage.
pub const INTERNAL_STORAGE: &str = "Internal storage";

/// Category of a bookmark row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkGroup {
    Temporary,
    Location,
    External,
    Bookmark,
}

impl BookmarkGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkGroup::Temporary => "temporary",
            BookmarkGroup::Location => "location",
            BookmarkGroup::External => "external",
            BookmarkGroup::Bookmark => "bookmark",
        }
    }

    /// Temporary and permanent bookmarks share one run in the list.
    pub fn is_user_defined(&self) -> bool {
        matches!(self, BookmarkGroup::Bookmark | BookmarkGroup::Temporary)
    }
}

impl fmt::Display for BookmarkGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temporary" => Ok(BookmarkGroup::Temporary),
            "location" => Ok(BookmarkGroup::Location),
            "external" => Ok(BookmarkGroup::External),
            "bookmark" => Ok(BookmarkGroup::Bookmark),
            other => Err(format!("unknown bookmark group: {other}")),
        }
    }
}

/// Order in which groups appear in the list. Never contains duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrder(Vec<BookmarkGroup>);

impl GroupOrder {
    /// Build an order, dropping repeated groups after their first occurrence.
    pub fn new(groups: impl IntoIterator<Item = BookmarkGroup>) -> Self {
        let mut order = Vec::new();
        for group in groups {
            if !order.contains(&group) {
                order.push(group);
            }
        }
        Self(order)
    }

    pub fn contains(&self, group: BookmarkGroup) -> bool {
        self.0.contains(&group)
    }

    pub fn groups(&self) -> &[BookmarkGroup] {
        &self.0
    }

    /// Groups that own a run in the list, in display order.
    ///
    /// Temporary entries live inside the bookmark run, and the bookmark run
    /// is always present: it goes last when the order does not mention it.
    pub fn runs(&self) -> Vec<BookmarkGroup> {
        let mut runs: Vec<_> = self
            .0
            .iter()
            .copied()
            .filter(|g| *g != BookmarkGroup::Temporary)
            .collect();
        if !runs.contains(&BookmarkGroup::Bookmark) {
            runs.push(BookmarkGroup::Bookmark);
        }
        runs
    }
}

impl Default for GroupOrder {
    fn default() -> Self {
        Self(vec![
            BookmarkGroup::Location,
            BookmarkGroup::External,
            BookmarkGroup::Bookmark,
        ])
    }
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.0.iter().map(BookmarkGroup::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<BookmarkGroup>, _>>()?;
        Ok(Self::new(groups))
    }
}

/// A physical path resolving to the same logical folder on another device.
///
/// Immutable once built; two alternatives are equal when their paths are.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct LocationAlternative {
    display_name: String,
    path: String,
    device_name: String,
}

impl LocationAlternative {
    pub fn new(
        display_name: impl Into<String>,
        path: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            path: path.into(),
            device_name: device_name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl PartialEq for LocationAlternative {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

/// One navigable row of the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkEntry {
    pub group: BookmarkGroup,
    pub name: String,
    pub icon: String,
    /// Currently selected path.
    pub path: String,
    /// Canonical path the entry was created with.
    pub default_path: String,
    /// Either empty or at least two items, the first mirroring `default_path`.
    pub alternatives: Vec<LocationAlternative>,
    pub show_size: bool,
    pub user_defined: bool,
}

impl BookmarkEntry {
    pub fn new(
        group: BookmarkGroup,
        name: impl Into<String>,
        icon: impl Into<String>,
        path: impl Into<String>,
        show_size: bool,
        user_defined: bool,
    ) -> Self {
        let path = path.into();
        Self {
            group,
            name: name.into(),
            icon: icon.into(),
            default_path: path.clone(),
            path,
            alternatives: Vec::new(),
            show_size,
            user_defined,
        }
    }

    /// A user bookmark, permanent or temporary.
    pub fn user_defined(path: impl Into<String>, name: impl Into<String>, permanent: bool) -> Self {
        let (group, icon) = if permanent {
            (BookmarkGroup::Bookmark, BOOKMARK_ICON)
        } else {
            (BookmarkGroup::Temporary, TEMPORARY_ICON)
        };
        Self::new(group, name, icon, path, false, true)
    }

    /// Unique device names of the alternatives, in order.
    pub fn devices(&self) -> Vec<String> {
        let mut devices: Vec<String> = Vec::with_capacity(self.alternatives.len());
        for alt in &self.alternatives {
            if !devices.iter().any(|d| d == alt.device_name()) {
                devices.push(alt.device_name().to_string());
            }
        }
        devices
    }

    pub fn has_alternative(&self, path: &str) -> bool {
        self.alternatives.iter().any(|alt| alt.path() == path)
    }

    /// Drop all alternatives and point back at the canonical path.
    pub fn clear_alternatives(&mut self) {
        self.alternatives.clear();
        self.path = self.default_path.clone();
    }
}

/// One element of the persisted bookmarks document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub name: String,
    pub path: String,
}

/// Default display name for a user bookmark: the final path segment.
pub fn default_bookmark_name(path: &str) -> String {
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "/".to_string(),
    }
}

/// The standard folders that may have counterparts on removable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownFolder {
    Documents,
    Downloads,
    Pictures,
    Videos,
    Music,
}

impl WellKnownFolder {
    /// Identify a well-known folder by its row icon.
    pub fn from_icon(icon: &str) -> Option<Self> {
        match icon {
            DOCUMENTS_ICON => Some(Self::Documents),
            DOWNLOADS_ICON => Some(Self::Downloads),
            PICTURES_ICON => Some(Self::Pictures),
            VIDEOS_ICON => Some(Self::Videos),
            MUSIC_ICON => Some(Self::Music),
            _ => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Documents => DOCUMENTS_ICON,
            Self::Downloads => DOWNLOADS_ICON,
            Self::Pictures => PICTURES_ICON,
            Self::Videos => VIDEOS_ICON,
            Self::Music => MUSIC_ICON,
        }
    }

    /// Display name of the folder.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Downloads => "Downloads",
            Self::Pictures => "Pictures",
            Self::Videos => "Videos",
            Self::Music => "Music",
        }
    }

    /// Folder name used for this kind inside Android storage.
    pub fn android_name(&self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Downloads => "Download",
            Self::Pictures => "Pictures",
            Self::Videos => "Movies",
            Self::Music => "Music",
        }
    }
}

/// Fields exposed to list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Group,
    Name,
    Icon,
    Path,
    Alternatives,
    Devices,
    ShowSize,
    UserDefined,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Group,
        Role::Name,
        Role::Icon,
        Role::Path,
        Role::Alternatives,
        Role::Devices,
        Role::ShowSize,
        Role::UserDefined,
    ];

    /// Name the role is exposed under.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Group => "group",
            Role::Name => "name",
            Role::Icon => "thumbnail",
            Role::Path => "path",
            Role::Alternatives => "alternatives",
            Role::Devices => "devices",
            Role::ShowSize => "showSize",
            Role::UserDefined => "userDefined",
        }
    }
}

/// Value of one role for one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoleData {
    Group(BookmarkGroup),
    Text(String),
    Alternatives(Vec<LocationAlternative>),
    Devices(Vec<String>),
    Flag(bool),
}

impl RoleData {
    pub fn of(entry: &BookmarkEntry, role: Role) -> Self {
        match role {
            Role::Group => RoleData::Group(entry.group),
            Role::Name => RoleData::Text(entry.name.clone()),
            Role::Icon => RoleData::Text(entry.icon.clone()),
            Role::Path => RoleData::Text(entry.path.clone()),
            Role::Alternatives => RoleData::Alternatives(entry.alternatives.clone()),
            Role::Devices => RoleData::Devices(entry.devices()),
            Role::ShowSize => RoleData::Flag(entry.show_size),
            Role::UserDefined => RoleData::Flag(entry.user_defined),
        }
    }
}
