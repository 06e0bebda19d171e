//! Matches the live mount list against the external device rows.

use std::collections::HashSet;

use super::alternates::update_alternatives;
use super::ignore::IgnoreList;
use super::mounts::{MountSource, MountedVolume, external_entry};
use super::store::EntryStore;
use super::types::{BookmarkGroup, LocationAlternative};

/// Devices that appeared or vanished during one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceChanges {
    /// One alternative per new device: title, mount root, title.
    pub added: Vec<LocationAlternative>,
    pub removed: usize,
}

impl DeviceChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed == 0
    }
}

/// Whether a volume may show up as an external device at all.
pub fn is_candidate(volume: &MountedVolume, ignored: &IgnoreList) -> bool {
    volume.valid()
        && volume.ready
        && !volume.is_root
        && !volume.is_volatile()
        && !ignored.is_ignored(&volume.mount_root)
}

/// Bring the external run in line with the mounted volumes, then update the
/// alternatives of the standard locations.
///
/// New volumes are appended to the external run in detection order, rows of
/// volumes that are gone are removed. Nothing happens when the group order
/// hides external devices.
pub fn reconcile(
    store: &mut EntryStore,
    mounts: &dyn MountSource,
    ignored: &IgnoreList,
) -> DeviceChanges {
    if !store.order().contains(BookmarkGroup::External) {
        return DeviceChanges::default();
    }

    let known = store.external_paths();
    let mut active: HashSet<String> = HashSet::new();
    let mut changes = DeviceChanges::default();

    for volume in mounts.mounted_volumes() {
        if !is_candidate(&volume, ignored) {
            continue;
        }
        if !active.insert(volume.mount_root.clone()) || known.contains(&volume.mount_root) {
            continue;
        }

        crate::log_event!(
            "mounts",
            "new mount detected",
            "{} {} {} {}",
            volume.display_name,
            volume.device_path,
            volume.filesystem_type,
            volume.mount_root
        );

        let entry = external_entry(&volume);
        let device = LocationAlternative::new(&entry.name, &entry.path, &entry.name);
        if store.insert_external(entry).is_some() {
            changes.added.push(device);
        }
    }

    for path in known.difference(&active) {
        if store.remove_external(path).is_some() {
            crate::log_event!("mounts", "mount gone", "{path}");
            changes.removed += 1;
        }
    }

    update_alternatives(store, &changes.added, changes.removed);
    changes
}
