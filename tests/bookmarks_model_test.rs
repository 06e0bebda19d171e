use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use placemark::RawSettings;
use placemark::bookmarks::{
    BookmarkGroup, BookmarkRecord, BookmarksModel, INTERNAL_STORAGE, ModelEvent, MountSource,
    MountedVolume, StandardLocations, drain,
};
use tempfile::TempDir;

/// Mount source whose volume list can be changed while the model holds it.
#[derive(Clone, Default)]
struct FakeMounts(Arc<Mutex<Vec<MountedVolume>>>);

impl FakeMounts {
    fn mount(&self, root: &Path, name: &str) {
        let volume = MountedVolume::new("/dev/sda1", root.to_string_lossy(), "vfat")
            .with_display_name(name);
        self.0.lock().push(volume);
    }

    fn unmount_all(&self) {
        self.0.lock().clear();
    }
}

impl MountSource for FakeMounts {
    fn mounted_volumes(&self) -> Vec<MountedVolume> {
        self.0.lock().clone()
    }
}

struct Fixture {
    dir: TempDir,
    mounts: FakeMounts,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("home/Music")).unwrap();
        Self {
            dir,
            mounts: FakeMounts::default(),
        }
    }

    fn bookmarks_file(&self) -> PathBuf {
        self.dir.path().join("config/bookmarks.json")
    }

    /// Like [`new`](Self::new), without a local `Music` folder.
    fn without_local_music() -> Self {
        let fixture = Self::new();
        std::fs::remove_dir(fixture.dir.path().join("home/Music")).unwrap();
        fixture
    }

    fn model(&self) -> BookmarksModel {
        self.builder().build().unwrap()
    }

    fn builder(&self) -> placemark::bookmarks::BookmarksModelBuilder {
        BookmarksModel::builder()
            .bookmarks_file(self.bookmarks_file())
            .ignored_mounts_file(self.dir.path().join("config/ignored-mounts.json"))
            .mounts(self.mounts.clone())
            .locations(StandardLocations::under(self.dir.path().join("home")))
    }

    fn saved_paths(&self) -> Vec<String> {
        let text = std::fs::read_to_string(self.bookmarks_file()).unwrap();
        let records: Vec<BookmarkRecord> = serde_json::from_str(&text).unwrap();
        records.into_iter().map(|record| record.path).collect()
    }

    /// A device root with the given folders below it.
    fn device(&self, name: &str, folders: &[&str]) -> PathBuf {
        let root = self.dir.path().join("media").join(name);
        for folder in folders {
            std::fs::create_dir_all(root.join(folder)).unwrap();
        }
        std::fs::create_dir_all(&root).unwrap();
        root
    }
}

fn music_row(model: &BookmarksModel) -> usize {
    model
        .entries()
        .iter()
        .position(|entry| entry.name == "Music" && entry.group == BookmarkGroup::Location)
        .unwrap()
}

fn assert_alternatives_well_formed(model: &BookmarksModel) {
    for entry in model.entries() {
        let count = entry.alternatives.len();
        assert!(count == 0 || count >= 2, "{} has {count} alternatives", entry.name);
        if count > 0 {
            assert_eq!(entry.alternatives[0].display_name(), INTERNAL_STORAGE);
            assert_eq!(entry.alternatives[0].path(), entry.default_path);
            assert!(entry.path.is_empty() || entry.has_alternative(&entry.path));
        }
    }
}

#[test]
fn test_add_is_idempotent() {
    let fixture = Fixture::new();
    let mut model = fixture.model();

    model.add("/srv/share", "Share");
    let rows = model.row_count();
    model.add("/srv/share", "Other name");
    model.add("", "empty");

    assert_eq!(model.row_count(), rows);
    assert_eq!(model.bookmark_name("/srv/share"), "Share");
}

#[test]
fn test_save_and_reload_round_trip() {
    let fixture = Fixture::new();
    {
        let mut model = fixture.model();
        model.add("/srv/a", "A");
        model.add("/srv/b", "");
        model.add_temporary("/tmp/t", "T");

        let last = model.boundaries().last_user_defined.unwrap();
        assert!(model.move_entry(last, last - 1, false));
        model.save();
    }

    let model = fixture.model();
    let user: Vec<(&str, &str)> = model
        .entries()
        .iter()
        .filter(|entry| entry.user_defined)
        .map(|entry| (entry.name.as_str(), entry.path.as_str()))
        .collect();
    assert_eq!(user, vec![("b", "/srv/b"), ("A", "/srv/a")]);
}

#[test]
fn test_document_is_a_plain_array_of_records() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.add("/srv/a", "A");

    let text = std::fs::read_to_string(fixture.bookmarks_file()).unwrap();
    let records: Vec<BookmarkRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/srv/a");
    assert!(text.ends_with('\n'));
}

#[test]
fn test_remove_and_rename_only_touch_bookmarks() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    let home = model.get(0).unwrap().path.clone();

    model.remove(&home);
    model.rename(&home, "Not mine");
    assert_eq!(model.get(0).unwrap().name, "Home");

    model.add("/srv/a", "A");
    model.rename("/srv/a", "Renamed");
    assert_eq!(model.bookmark_name("/srv/a"), "Renamed");
    model.remove("/srv/a");
    assert!(!model.has_bookmark("/srv/a"));
}

#[test]
fn test_new_device_shifts_user_run_by_one() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.add("/srv/a", "A");
    let before = model.boundaries();

    let root = fixture.device("stick", &[]);
    fixture.mounts.mount(&root, "Stick");
    let mut events = model.subscribe();
    let changes = model.update_external_devices();

    assert_eq!(changes.added.len(), 1);
    let after = model.boundaries();
    assert_eq!(after.first_external, before.first_external);
    assert_eq!(after.first_user_defined, before.first_user_defined + 1);
    assert_eq!(
        after.last_user_defined,
        before.last_user_defined.map(|row| row + 1)
    );
    assert_eq!(model.get(before.first_external).unwrap().name, "Stick");
    assert_eq!(
        drain(&mut events),
        vec![ModelEvent::RowsInserted {
            first: before.first_external,
            last: before.first_external
        }]
    );

    // Already known, nothing to do
    assert!(model.update_external_devices().is_empty());
}

#[test]
fn test_device_with_music_folder_becomes_alternative() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    let root = fixture.device("card", &["Music"]);
    fixture.mounts.mount(&root, "Card");

    model.update_external_devices();
    let entry = model.get(music_row(&model)).unwrap();

    assert_eq!(entry.alternatives.len(), 2);
    assert_eq!(entry.alternatives[1].display_name(), "Card");
    assert_eq!(
        entry.alternatives[1].path(),
        root.join("Music").to_string_lossy()
    );
    assert_eq!(entry.devices(), vec![INTERNAL_STORAGE.to_string(), "Card".to_string()]);
    assert_alternatives_well_formed(&model);
}

#[test]
fn test_two_devices_are_disambiguated() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    let first = fixture.device("first", &["Music"]);
    let second = fixture.device("second", &["Music"]);
    fixture.mounts.mount(&first, "First");
    fixture.mounts.mount(&second, "Second");

    model.update_external_devices();
    let entry = model.get(music_row(&model)).unwrap();

    assert_eq!(entry.alternatives.len(), 3);
    let names: Vec<&str> = entry.alternatives.iter().map(|alt| alt.display_name()).collect();
    assert!(names.contains(&"“Music” on “First”"));
    assert!(names.contains(&"“Music” on “Second”"));
    assert_alternatives_well_formed(&model);
}

#[test]
fn test_unmount_drops_alternatives_and_selection() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    let root = fixture.device("card", &["Music"]);
    fixture.mounts.mount(&root, "Card");
    model.update_external_devices();

    let row = music_row(&model);
    let on_card = root.join("Music").to_string_lossy().into_owned();
    model.select_alternative(row, &on_card);
    assert_eq!(model.get(row).unwrap().path, on_card);

    fixture.mounts.unmount_all();
    std::fs::remove_dir_all(&root).unwrap();
    let changes = model.update_external_devices();

    assert_eq!(changes.removed, 1);
    let entry = model.get(row).unwrap();
    assert!(entry.alternatives.is_empty());
    assert_eq!(entry.path, entry.default_path);
    assert_eq!(model.boundaries().first_external, model.boundaries().first_user_defined);
}

#[test]
fn test_ignored_mount_never_shows_up() {
    let fixture = Fixture::new();
    let root = fixture.device("hidden", &["Music"]);
    let ignore_file = fixture.dir.path().join("config/ignored-mounts.json");
    std::fs::create_dir_all(ignore_file.parent().unwrap()).unwrap();
    std::fs::write(
        &ignore_file,
        serde_json::json!({ "fullPaths": [root.to_string_lossy()], "basePaths": [] }).to_string(),
    )
    .unwrap();
    fixture.mounts.mount(&root, "Hidden");

    let mut model = fixture.model();
    let rows = model.row_count();

    assert!(model.update_external_devices().is_empty());
    assert_eq!(model.row_count(), rows);
    assert!(model.entries().iter().all(|e| e.group != BookmarkGroup::External));
}

#[test]
fn test_ignore_list_edit_is_picked_up_on_tick() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    let root = fixture.device("late", &[]);

    std::fs::write(
        fixture.dir.path().join("config/ignored-mounts.json"),
        serde_json::json!({ "fullPaths": [], "basePaths": [format!("{}/", fixture.dir.path().join("media").display())] })
            .to_string(),
    )
    .unwrap();
    let report = model.tick();
    assert!(report.ignore_list_reloaded);

    fixture.mounts.mount(&root, "Late");
    assert!(model.tick().devices.is_empty());
    assert!(model.ignore_list().is_ignored(&root.to_string_lossy()));
}

#[test]
fn test_temporary_entries_are_not_persisted() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.add_temporary("/tmp/scratch", "Scratch");
    assert!(!fixture.bookmarks_file().exists());

    assert_eq!(model.clear_temporary(), 1);
    assert_eq!(model.bookmark_name("/tmp/scratch"), "");
}

#[test]
fn test_missing_local_folder_keeps_internal_storage_first() {
    let fixture = Fixture::without_local_music();
    let mut model = fixture.model();

    let first = fixture.device("a", &["Music"]);
    fixture.mounts.mount(&first, "A");
    model.update_external_devices();
    let second = fixture.device("b", &["Music"]);
    fixture.mounts.mount(&second, "B");
    model.update_external_devices();

    let entry = model.get(music_row(&model)).unwrap();
    assert_eq!(entry.alternatives.len(), 3);
    assert_alternatives_well_formed(&model);
}

#[test]
fn test_device_in_later_pass_keeps_plain_name() {
    let fixture = Fixture::new();
    let mut model = fixture.model();

    let first = fixture.device("first", &["Music"]);
    fixture.mounts.mount(&first, "First");
    model.update_external_devices();
    let second = fixture.device("second", &["Music"]);
    fixture.mounts.mount(&second, "Second");
    model.update_external_devices();

    // Each pass found one match, so neither name is qualified
    let entry = model.get(music_row(&model)).unwrap();
    let names: Vec<&str> = entry.alternatives.iter().map(|alt| alt.display_name()).collect();
    assert_eq!(names, vec![INTERNAL_STORAGE, "Second", "First"]);
}

#[test]
fn test_edits_during_migration_are_kept() {
    let fixture = Fixture::new();
    let settings = Arc::new(RawSettings::new(
        fixture.dir.path().join("settings.toml"),
        vec![fixture.dir.path().to_path_buf()],
    ));
    settings.write("Bookmarks/Entries", r#"["/srv/legacy1", "/srv/legacy2"]"#, None);

    let mut model = fixture.builder().migrate_from(settings.clone()).build().unwrap();
    model.add("/srv/new", "New");
    model.wait_for_migration();
    model.tick();

    assert_eq!(
        fixture.saved_paths(),
        vec!["/srv/legacy1", "/srv/legacy2", "/srv/new"]
    );
    assert!(model.has_bookmark("/srv/legacy1"));
    assert!(model.has_bookmark("/srv/new"));
    assert!(!settings.has_key("Bookmarks/Entries", None));
}

#[test]
fn test_remove_respects_the_entry_kind() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.add("/srv/keep", "Keep");
    model.add_temporary("/tmp/scratch", "Scratch");

    model.remove_temporary("/srv/keep");
    model.remove("/tmp/scratch");
    assert!(model.has_bookmark("/srv/keep"));
    assert_eq!(model.bookmark_name("/tmp/scratch"), "Scratch");

    model.remove("/srv/keep");
    model.reload();
    assert!(!model.has_bookmark("/srv/keep"));
    assert!(fixture.saved_paths().is_empty());
}

#[test]
fn test_temporary_entries_survive_reload() {
    let fixture = Fixture::new();
    let mut model = fixture.model();
    model.add("/srv/a", "A");
    model.add_temporary("/tmp/scratch", "Scratch");

    // Another process rewrites the document
    std::fs::write(
        fixture.bookmarks_file(),
        r#"[{"name": "A", "path": "/srv/a"}, {"name": "B", "path": "/srv/b"}]"#,
    )
    .unwrap();
    model.reload();

    let first_user = model.boundaries().first_user_defined;
    let entry = model.get(first_user).unwrap();
    assert_eq!(entry.path, "/tmp/scratch");
    assert_eq!(entry.group, BookmarkGroup::Temporary);
    assert!(model.has_bookmark("/srv/b"));
    assert_eq!(fixture.saved_paths(), vec!["/srv/a", "/srv/b"]);
}
