//! File-level editing through `Shortcuts`
//!
//! Covers the lock, the backup copy and the atomic rewrite around the
//! in-memory writer.

mod common;

use common::{store, Shortcut};
use shortcut_store::io::backup_path;
use shortcut_store::lock::lock_path;
use shortcut_store::steam::shortcuts_path;
use shortcut_store::{parse, Config, Shortcuts, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn sample_store() -> Vec<u8> {
    store(&[
        Shortcut::new("Test Game", "\"C:\\game.exe\"").tag("favorite"),
        Shortcut::new("Foo", "\"/usr/bin/foo\"").icon("/old/foo.ico"),
    ])
}

/// Temp dir holding a `shortcuts.vdf` with the sample store
fn store_on_disk() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shortcuts.vdf");
    fs::write(&path, sample_store()).unwrap();
    (dir, path)
}

#[test]
fn test_open_lists_entries() {
    let (_dir, path) = store_on_disk();
    let shortcuts = Shortcuts::open(&path).unwrap();

    let entries = shortcuts.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].identifier, 3_858_095_309);
    assert_eq!(entries[1].identifier, 3_810_698_013);
    assert_eq!(entries[1].icon_path.as_deref(), Some("/old/foo.ico"));
    assert_eq!(shortcuts.path(), path.as_path());
    assert_eq!(shortcuts.as_bytes(), sample_store().as_slice());
}

#[test]
fn test_set_icon_persists_and_backs_up() {
    let (_dir, path) = store_on_disk();
    let original = fs::read(&path).unwrap();

    let mut shortcuts = Shortcuts::open(&path).unwrap();
    let entry = shortcuts.set_icon(0, "/cache/123_icon.png").unwrap();
    assert_eq!(entry.icon_path.as_deref(), Some("/cache/123_icon.png"));

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(on_disk, shortcuts.as_bytes());
    assert_eq!(
        parse(&on_disk).unwrap()[0].icon_path.as_deref(),
        Some("/cache/123_icon.png")
    );
    assert_eq!(fs::read(backup_path(&path)).unwrap(), original);
}

#[test]
fn test_backup_can_be_disabled() {
    let (_dir, path) = store_on_disk();

    let mut shortcuts = Shortcuts::open(&path).unwrap().with_backup(false);
    shortcuts.set_icon(1, "/cache/foo.png").unwrap();

    assert!(!backup_path(&path).exists());
    assert_eq!(
        parse(&fs::read(&path).unwrap()).unwrap()[1].icon_path.as_deref(),
        Some("/cache/foo.png")
    );
}

#[cfg(unix)]
#[test]
fn test_set_icon_keeps_store_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = store_on_disk();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let mut shortcuts = Shortcuts::open(&path).unwrap().with_backup(false);
    shortcuts.set_icon(0, "/x.png").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_successive_edits_build_on_each_other() {
    let (_dir, path) = store_on_disk();

    let mut shortcuts = Shortcuts::open(&path).unwrap().with_backup(false);
    shortcuts.set_icon(0, "/a.png").unwrap();
    shortcuts.set_icon(1, "/b.png").unwrap();
    drop(shortcuts);

    let entries = parse(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(entries[0].icon_path.as_deref(), Some("/a.png"));
    assert_eq!(entries[1].icon_path.as_deref(), Some("/b.png"));
}

#[test]
fn test_failed_edit_writes_nothing() {
    let (_dir, path) = store_on_disk();
    let original = fs::read(&path).unwrap();

    let mut shortcuts = Shortcuts::open(&path).unwrap();
    assert!(matches!(
        shortcuts.set_icon(2, "/x.png"),
        Err(StoreError::EntryNotFound { position: 2, count: 2 })
    ));
    assert!(matches!(
        shortcuts.set_icon(0, "bad\u{3}path"),
        Err(StoreError::InvalidFieldValue(_))
    ));

    assert_eq!(fs::read(&path).unwrap(), original);
    assert_eq!(shortcuts.as_bytes(), original.as_slice());
    assert!(!backup_path(&path).exists());
}

#[test]
fn test_store_is_locked_while_open() {
    let (_dir, path) = store_on_disk();

    let first = Shortcuts::open(&path).unwrap();
    assert!(lock_path(&path).exists());

    match Shortcuts::open(&path) {
        Err(StoreError::Locked { path: lock_file, .. }) => assert_eq!(lock_file, lock_path(&path)),
        other => panic!("expected a lock error, got {:?}", other.map(|s| s.entries().len())),
    }

    drop(first);
    assert!(Shortcuts::open(&path).is_ok());
}

#[test]
fn test_missing_store() {
    let dir = tempdir().unwrap();

    match Shortcuts::open(dir.path().join("shortcuts.vdf")) {
        Err(StoreError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected NotFound, got {:?}", other.map(|s| s.entries().len())),
    }
}

#[test]
fn test_malformed_store_is_not_opened() {
    let (_dir, path) = store_on_disk();
    fs::write(&path, b"\x00shortcuts\x00\x00broken").unwrap();

    assert!(matches!(
        Shortcuts::open(&path),
        Err(StoreError::MalformedStore { .. })
    ));
}

#[test]
fn test_open_with_config() {
    let dir = tempdir().unwrap();
    let path = shortcuts_path(dir.path(), 22_202);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, sample_store()).unwrap();

    let config = Config::from_toml_str(&format!(
        "steam_root = {:?}\naccount_id = 22202\nbackup = false\n",
        dir.path().to_str().unwrap()
    ))
    .unwrap();

    let mut shortcuts = Shortcuts::open_with_config(&config).unwrap();
    assert_eq!(shortcuts.path(), path.as_path());
    shortcuts.set_icon(0, "/x.png").unwrap();

    assert!(!backup_path(&path).exists());
}
