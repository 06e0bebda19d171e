//! Mounted volume enumeration and device classification.

use std::path::Path;

use serde::Serialize;
use sysinfo::Disks;

use super::types::{BookmarkEntry, BookmarkGroup};

/// Snapshot of one mounted volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountedVolume {
    pub device_path: String,
    pub mount_root: String,
    pub filesystem_type: String,
    pub display_name: String,
    pub ready: bool,
    pub is_root: bool,
}

impl MountedVolume {
    /// A volume mounted at `mount_root`, ready and named after its root.
    pub fn new(
        device_path: impl Into<String>,
        mount_root: impl Into<String>,
        filesystem_type: impl Into<String>,
    ) -> Self {
        let mount_root = mount_root.into();
        Self {
            device_path: device_path.into(),
            display_name: mount_root.clone(),
            is_root: mount_root == "/",
            mount_root,
            filesystem_type: filesystem_type.into(),
            ready: true,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn valid(&self) -> bool {
        !self.mount_root.is_empty()
    }

    /// In-memory filesystems never hold user data worth bookmarking.
    pub fn is_volatile(&self) -> bool {
        self.filesystem_type == "tmpfs"
    }
}

/// Source of the currently mounted volumes.
pub trait MountSource: Send + Sync {
    fn mounted_volumes(&self) -> Vec<MountedVolume>;
}

/// Mounted volumes as reported by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMounts;

impl MountSource for SystemMounts {
    fn mounted_volumes(&self) -> Vec<MountedVolume> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .map(|disk| {
                let mount_root = disk.mount_point().to_string_lossy().into_owned();
                MountedVolume {
                    device_path: disk.name().to_string_lossy().into_owned(),
                    // No volume label in the disk listing, the mount root stands in
                    display_name: mount_root.clone(),
                    is_root: disk.mount_point() == Path::new("/"),
                    filesystem_type: disk.file_system().to_string_lossy().into_owned(),
                    ready: true,
                    mount_root,
                }
            })
            .collect()
    }
}

/// Rough kind of an external device. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceKind {
    SdCard,
    BindMount,
    Remote,
    Removable,
}

impl DeviceKind {
    pub fn classify(volume: &MountedVolume) -> Self {
        if volume.device_path.starts_with("/dev/mmc") {
            DeviceKind::SdCard
        } else if volume.device_path.starts_with("/dev/mapper/sailfish-") {
            // Bind mounts show up with the home mapper device
            DeviceKind::BindMount
        } else if volume.filesystem_type == "cifs" {
            DeviceKind::Remote
        } else {
            DeviceKind::Removable
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DeviceKind::SdCard => "icon-m-sd-card",
            DeviceKind::BindMount => "icon-m-attach",
            DeviceKind::Remote => "icon-m-website",
            DeviceKind::Removable => "icon-m-usb",
        }
    }

    /// Title used when the volume has no better name than its mount root.
    pub fn fallback_title(&self) -> &'static str {
        match self {
            DeviceKind::SdCard => "Memory card",
            DeviceKind::BindMount => "Attached folder",
            DeviceKind::Remote => "Remote folder",
            DeviceKind::Removable => "Removable media",
        }
    }
}

/// Build the external entry for a newly detected volume.
pub fn external_entry(volume: &MountedVolume) -> BookmarkEntry {
    let kind = DeviceKind::classify(volume);
    let title = if volume.display_name.is_empty() || volume.display_name == volume.mount_root {
        kind.fallback_title().to_string()
    } else {
        volume.display_name.clone()
    };

    BookmarkEntry::new(
        BookmarkGroup::External,
        title,
        kind.icon(),
        volume.mount_root.clone(),
        true,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_priority() {
        // The memory card pattern wins even on a network filesystem
        let sd = MountedVolume::new("/dev/mmcblk1p1", "/run/media/user/sd", "cifs");
        assert_eq!(DeviceKind::classify(&sd), DeviceKind::SdCard);

        let bind = MountedVolume::new("/dev/mapper/sailfish-home", "/mnt/bound", "ext4");
        assert_eq!(DeviceKind::classify(&bind), DeviceKind::BindMount);

        let remote = MountedVolume::new("//nas/share", "/mnt/nas", "cifs");
        assert_eq!(DeviceKind::classify(&remote), DeviceKind::Remote);

        let usb = MountedVolume::new("/dev/sdb1", "/run/media/user/USB", "vfat");
        assert_eq!(DeviceKind::classify(&usb), DeviceKind::Removable);
    }

    #[test]
    fn test_entry_titles() {
        let unnamed = MountedVolume::new("/dev/mmcblk1p1", "/run/media/user/sd", "exfat");
        let entry = external_entry(&unnamed);
        assert_eq!(entry.name, "Memory card");
        assert_eq!(entry.icon, "icon-m-sd-card");
        assert_eq!(entry.group, BookmarkGroup::External);
        assert!(entry.show_size);
        assert!(!entry.user_defined);

        let named = MountedVolume::new("/dev/sdb1", "/run/media/user/USB", "vfat")
            .with_display_name("BACKUP");
        assert_eq!(external_entry(&named).name, "BACKUP");
    }

    #[test]
    fn test_volume_flags() {
        let root = MountedVolume::new("/dev/sda1", "/", "ext4");
        assert!(root.is_root);
        assert!(root.valid());

        let tmp = MountedVolume::new("tmpfs", "/tmp", "tmpfs");
        assert!(tmp.is_volatile());

        let broken = MountedVolume::new("/dev/sdz", "", "ext4");
        assert!(!broken.valid());
    }
}
