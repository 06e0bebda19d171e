//! Bookmark list commands (list, add, remove, rename, move).

use anyhow::Context;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::style;

use crate::bookmarks::{BookmarkGroup, BookmarksModel, Role, RoleData};
use crate::config::AppConfig;

use super::open_settings;

/// Open the model for `config`, finishing a pending migration first.
pub fn open_model(config: &AppConfig) -> anyhow::Result<BookmarksModel> {
    let settings = open_settings(config);
    let mut model = BookmarksModel::from_config(config, &settings)
        .context("Error opening the bookmarks list")?;
    model.wait_for_migration();
    Ok(model)
}

fn group_label(group: BookmarkGroup) -> &'static str {
    match group {
        BookmarkGroup::Location => "location",
        BookmarkGroup::External => "device",
        BookmarkGroup::Bookmark => "bookmark",
        BookmarkGroup::Temporary => "temporary",
    }
}

/// Print every row, as a table or as JSON objects keyed by role name.
pub fn run_list(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let model = open_model(config)?;

    if json {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = (0..model.row_count())
            .map(|row| {
                Role::ALL
                    .iter()
                    .filter_map(|role| {
                        let data = model.data(row, *role)?;
                        let value = serde_json::to_value(data).ok()?;
                        Some((role.name().to_string(), value))
                    })
                    .collect()
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Row", "Group", "Name", "Path"]);

    for (row, entry) in model.entries().iter().enumerate() {
        let mut path = entry.path.clone();
        if let Some(RoleData::Alternatives(alternatives)) = model.data(row, Role::Alternatives) {
            for alternative in alternatives {
                let marker = if alternative.path() == entry.path { '*' } else { '-' };
                path.push_str(&format!(
                    "\n {marker} {} ({})",
                    alternative.display_name(),
                    alternative.path()
                ));
            }
        }
        table.add_row(vec![
            row.to_string(),
            group_label(entry.group).to_string(),
            entry.name.clone(),
            path,
        ]);
    }

    println!("{table}");
    Ok(())
}

pub fn run_add(config: &AppConfig, path: &str, name: &str) -> anyhow::Result<()> {
    let mut model = open_model(config)?;
    if model.has_bookmark(path) {
        println!("Already bookmarked: {path}");
        return Ok(());
    }

    model.add(path, name);
    println!(
        "{} {} -> {path}",
        style("Added bookmark").green(),
        style(model.bookmark_name(path)).bold()
    );
    Ok(())
}

pub fn run_remove(config: &AppConfig, path: &str) -> anyhow::Result<()> {
    let mut model = open_model(config)?;
    if !model.has_bookmark(path) {
        anyhow::bail!("No bookmark for {path}");
    }

    model.remove(path);
    println!("{} {path}", style("Removed bookmark").green());
    Ok(())
}

pub fn run_rename(config: &AppConfig, path: &str, name: &str) -> anyhow::Result<()> {
    let mut model = open_model(config)?;
    if !model.has_bookmark(path) {
        anyhow::bail!("No bookmark for {path}");
    }

    model.rename(path, name);
    println!("Renamed bookmark {path} to {name}");
    Ok(())
}

pub fn run_move(config: &AppConfig, from: usize, to: usize) -> anyhow::Result<()> {
    let mut model = open_model(config)?;
    if !model.move_entry(from, to, true) {
        let rows = model.boundaries();
        anyhow::bail!(
            "Rows {from} and {to} must both be bookmarks (rows {} to {})",
            rows.first_user_defined,
            rows.last_user_defined
                .map(|row| row.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
    }

    println!("Moved row {from} to {to}");
    Ok(())
}
