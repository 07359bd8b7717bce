use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use trackit_core::storage::DiskStorage;
use trackit_core::Store;

fn temp_dir(prefix: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let mut path = std::env::temp_dir();
    path.push(format!(
        "trackit_storage_{}_{}_{}",
        prefix,
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_dir_all(&path);
    path
}

#[test]
fn open_creates_collection_files() {
    let dir = temp_dir("layout");
    let _store = Store::open(&dir).unwrap();
    assert!(dir.join("schemata.json").exists());
    assert!(dir.join("data.json").exists());
}

#[test]
fn open_is_idempotent() {
    let dir = temp_dir("idempotent");
    drop(Store::open(&dir).unwrap());
    drop(Store::open(&dir).unwrap());
    let store = Store::open(&dir).unwrap();
    assert!(store.get_archive().unwrap().is_empty());
}

#[test]
fn rows_survive_reopen() {
    let dir = temp_dir("reload");
    {
        let mut store = Store::open(&dir).unwrap();
        store
            .set_schema("alice", "daily", json!({"mood": {"type": "string"}}))
            .unwrap();
        store
            .set_datum("alice", "daily", "2024-01-01", json!({"mood": "good"}))
            .unwrap();
    }

    let store = Store::open(&dir).unwrap();
    assert_eq!(
        store.get_datum("alice", "daily", "2024-01-01").unwrap(),
        json!({"mood": "good"})
    );
    let schemata = store.get_schemata("alice").unwrap();
    assert_eq!(schemata["daily"], json!({"mood": {"type": "string"}}));
}

#[test]
fn overwrite_survives_reopen() {
    let dir = temp_dir("overwrite");
    {
        let mut store = Store::open(&dir).unwrap();
        store.set_datum("alice", "daily", "k", json!(1)).unwrap();
        store.set_datum("alice", "daily", "k", json!(2)).unwrap();
    }

    let store = Store::open(&dir).unwrap();
    assert_eq!(store.get_datum("alice", "daily", "k").unwrap(), json!(2));
    assert_eq!(store.get_data("alice", "daily").unwrap().len(), 1);
}

#[test]
fn purge_survives_reopen() {
    let dir = temp_dir("purge");
    {
        let mut store = Store::open(&dir).unwrap();
        store.set_schema("alice", "daily", json!({})).unwrap();
        store.set_datum("bob", "log", "k", json!(true)).unwrap();
        store.purge().unwrap();
    }

    let store = Store::open(&dir).unwrap();
    assert!(store.get_archive().unwrap().is_empty());
}

#[test]
fn archive_round_trip_across_disk_stores() -> anyhow::Result<()> {
    let source_dir = temp_dir("archive_src");
    let target_dir = temp_dir("archive_dst");

    let mut source = Store::open(&source_dir)?;
    source.set_schema("alice", "daily", json!({"mood": {}}))?;
    source.set_datum("alice", "daily", "2024-01-01", json!({"mood": "good"}))?;
    source.set_schema("bob", "workouts", json!({"reps": {}}))?;
    source.set_datum("bob", "workouts", "monday", json!({"reps": 12}))?;
    let archive = source.get_archive()?;

    let mut target: Store<DiskStorage> = Store::open(&target_dir)?;
    target.restore_archive(&archive)?;
    assert_eq!(target.get_archive()?, archive);

    // and the restored rows are durable
    let reopened = Store::open(&target_dir)?;
    assert_eq!(reopened.get_archive()?, archive);
    Ok(())
}
