use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let config_path = dir.join("placemark.toml");
    let content = format!(
        r#"config_dir = "{}"
writable_roots = ["{}"]
"#,
        dir.join("config").display(),
        dir.display()
    );
    std::fs::write(&config_path, content).unwrap();
    config_path
}

fn placemark(config: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_placemark"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run placemark")
}

#[test]
fn test_add_then_list() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path());

    let output = placemark(&config, &["add", "/srv/share", "--name", "Share"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = placemark(&config, &["list", "--json"]);
    assert!(output.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let bookmark = rows
        .iter()
        .find(|row| row["path"] == "/srv/share")
        .expect("bookmark row");
    assert_eq!(bookmark["name"], "Share");
    assert_eq!(bookmark["userDefined"], true);

    let document = temp_dir.path().join("config/bookmarks.json");
    assert!(document.exists());
}

#[test]
fn test_remove_unknown_bookmark_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path());

    let output = placemark(&config, &["remove", "/never/added"]);
    assert!(!output.status.success());
}

#[test]
fn test_set_and_get_setting() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path());

    let output = placemark(&config, &["set", "View/ViewMode", "grid"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = placemark(&config, &["get", "View/ViewMode"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "grid");

    let output = placemark(&config, &["set", "View/ViewMode", "sideways"]);
    assert!(!output.status.success());

    let output = placemark(&config, &["get", "No/SuchKey"]);
    assert!(!output.status.success());
}

#[test]
fn test_init_writes_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("fresh/placemark.toml");

    let output = placemark(&config, &["init"]);
    assert!(output.status.success());
    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("poll_interval_secs = 5"));

    let output = placemark(&config, &["init"]);
    assert!(!output.status.success());
}
