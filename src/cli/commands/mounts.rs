//! Mounts command - show what the device reconciler sees.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::style;

use crate::bookmarks::{DeviceKind, MountSource, SystemMounts, is_candidate};
use crate::config::AppConfig;

use super::bookmarks::open_model;

pub fn run_mounts(config: &AppConfig) -> anyhow::Result<()> {
    let model = open_model(config)?;
    let ignored = model.ignore_list();

    let volumes = SystemMounts.mounted_volumes();
    if volumes.is_empty() {
        println!("No mounted volumes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Status", "Mount root", "Filesystem", "Device"]);

    let mut listed = 0;
    for volume in volumes {
        let status = if is_candidate(&volume, ignored) {
            listed += 1;
            format!("{:?}", DeviceKind::classify(&volume))
        } else if ignored.is_ignored(&volume.mount_root) {
            "ignored".to_string()
        } else {
            "skipped".to_string()
        };
        table.add_row(vec![
            status,
            volume.mount_root,
            volume.filesystem_type,
            volume.device_path,
        ]);
    }

    println!("{table}");
    println!("{} listed as external devices", style(listed).cyan().bold());
    Ok(())
}
