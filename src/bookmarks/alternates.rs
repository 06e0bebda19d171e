//! Alternate path discovery for the well-known standard folders.
//!
//! When a device appears, each well-known location (documents, downloads,
//! pictures, videos, music) is probed for a folder of the same name directly
//! below the device's mount root. Matches become alternatives of the entry.
//! When devices disappear, alternatives whose paths are gone are dropped.

use std::path::Path;

use super::store::EntryStore;
use super::types::{BookmarkEntry, INTERNAL_STORAGE, LocationAlternative, Role, WellKnownFolder};

/// Update the alternatives of every well-known location row.
///
/// `new_devices` carries one alternative per newly detected device: its
/// display name, mount root and device name. `removed_count` is the number of
/// devices that disappeared. Does nothing when both are empty.
///
/// Returns the number of rows that changed.
pub fn update_alternatives(
    store: &mut EntryStore,
    new_devices: &[LocationAlternative],
    removed_count: usize,
) -> usize {
    if new_devices.is_empty() && removed_count == 0 {
        return 0;
    }

    let mut changed_rows = 0;
    for row in store.location_rows() {
        let Some(folder) = store
            .get(row)
            .and_then(|entry| WellKnownFolder::from_icon(&entry.icon))
        else {
            continue;
        };

        let changed = store.update_row(row, |entry| {
            if resolve_entry(entry, folder, new_devices) {
                vec![Role::Alternatives, Role::Path, Role::Devices]
            } else {
                Vec::new()
            }
        });
        if changed {
            crate::debug_event!(
                "alternates",
                "alternatives updated",
                "row {row}: {} alternatives",
                store.get(row).map_or(0, |e| e.alternatives.len())
            );
            changed_rows += 1;
        }
    }

    changed_rows
}

/// Recompute the alternatives of one entry. Returns whether anything changed.
fn resolve_entry(
    entry: &mut BookmarkEntry,
    folder: WellKnownFolder,
    new_devices: &[LocationAlternative],
) -> bool {
    let mut changed = false;

    // The first alternative mirrors the default path and is kept even when
    // the local folder does not exist
    let before = entry.alternatives.len();
    if before > 1 {
        let mut others = entry.alternatives.split_off(1);
        others.retain(|alt| Path::new(alt.path()).exists());
        entry.alternatives.append(&mut others);
    }
    if entry.alternatives.len() != before {
        changed = true;
        if entry.path != entry.default_path && !entry.has_alternative(&entry.path) {
            entry.path = entry.default_path.clone();
        }
    }

    let folder_name = entry
        .default_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    let mut names = vec![folder_name];
    if names[0] != folder.display_name() {
        names.push(folder.display_name().to_string());
    }

    // (folder name, probed path, device) for every new match
    let mut found: Vec<(&str, String, &LocationAlternative)> = Vec::new();
    for device in new_devices {
        for name in &names {
            if name.is_empty() {
                continue;
            }
            let option = Path::new(device.path()).join(name);
            let option = option.to_string_lossy().into_owned();
            if option_is_new(entry, &found, &option) && Path::new(&option).is_dir() {
                found.push((name.as_str(), option, device));
            }
        }
    }

    if !found.is_empty() {
        if entry
            .alternatives
            .first()
            .is_none_or(|first| first.path() != entry.default_path)
        {
            entry.alternatives.insert(
                0,
                LocationAlternative::new(
                    INTERNAL_STORAGE,
                    entry.default_path.clone(),
                    INTERNAL_STORAGE,
                ),
            );
        }

        let disambiguate = found.len() > 1;
        for (name, option, device) in found {
            let display_name = if disambiguate {
                format!("“{name}” on “{}”", device.display_name())
            } else {
                device.display_name().to_string()
            };
            entry.alternatives.insert(
                1,
                LocationAlternative::new(display_name, option, device.device_name()),
            );
        }
        changed = true;
    }

    // The first alternative mirrors the default path, a lone one means every
    // real alternative is gone
    if entry.alternatives.len() == 1 {
        entry.clear_alternatives();
        changed = true;
    }

    changed
}

fn option_is_new(
    entry: &BookmarkEntry,
    found: &[(&str, String, &LocationAlternative)],
    option: &str,
) -> bool {
    !entry.has_alternative(option)
        && option != entry.default_path
        && !found.iter().any(|(_, path, _)| path == option)
}
