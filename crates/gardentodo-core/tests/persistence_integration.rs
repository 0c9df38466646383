//! Integration tests for task persistence.
//!
//! This test file verifies:
//! - Persist/reload round trips of every task field
//! - Legacy records without ids
//! - Fail-soft loading of corrupt blobs
//! - File-backed databases across reopen

use gardentodo_core::{Database, DateKey, KeyValueStore, Store, TaskId, TaskStore};

const KEY: &str = "gardenTodo";

fn day(s: &str) -> DateKey {
    s.parse().unwrap()
}

#[test]
fn test_round_trip_preserves_every_field() {
    let mut store = TaskStore::with_key(Database::open_memory().unwrap(), KEY);
    let d = day("2024-02-05");
    let a = store.add_task(d, "Stretch").unwrap().unwrap();
    let b = store.add_task(d, "Read 20 pages").unwrap().unwrap();
    store.toggle_task(d, b.id).unwrap();
    store.add_task(day("2024-02-06"), "Walk").unwrap();
    let cleared = store.add_task(day("2024-02-07"), "Temp").unwrap().unwrap();
    store.remove_task(day("2024-02-07"), cleared.id).unwrap();

    let snapshot = store.store().clone();
    let reloaded = TaskStore::with_key(store.into_backend(), KEY);

    assert_eq!(reloaded.store(), &snapshot);
    let tasks = reloaded.get_tasks_for(&d);
    assert_eq!(tasks[0].id, a.id);
    assert_eq!(tasks[0].text, "Stretch");
    assert!(!tasks[0].completed);
    assert_eq!(tasks[1].id, b.id);
    assert!(tasks[1].completed);
    // A cleared day survives as an empty bucket, distinct from a never-written day.
    assert!(reloaded.store().contains_day(&day("2024-02-07")));
    assert!(!reloaded.store().contains_day(&day("2024-02-08")));
}

#[test]
fn test_legacy_tasks_get_distinct_ids_per_load() {
    let mut db = Database::open_memory().unwrap();
    db.set(
        KEY,
        r#"{"2024-2-5": [{"text": "legacy one", "completed": true}, {"text": "legacy two"}]}"#,
    )
    .unwrap();

    let first = Store::load(&db, KEY);
    let second = Store::load(&db, KEY);
    let d = day("2024-02-05");
    let first_ids: Vec<TaskId> = first.tasks_for(&d).iter().map(|t| t.id).collect();
    let second_ids: Vec<TaskId> = second.tasks_for(&d).iter().map(|t| t.id).collect();

    assert_eq!(first_ids.len(), 2);
    assert_ne!(first_ids[0], first_ids[1]);
    assert_ne!(first_ids[0], second_ids[0]);
    assert_ne!(first_ids[1], second_ids[1]);
}

#[test]
fn test_patched_legacy_tasks_are_addressable() {
    let mut db = Database::open_memory().unwrap();
    db.set(KEY, r#"{"2024-2-5": [{"text": "a"}, {"text": "b"}, {"text": "c"}]}"#)
        .unwrap();

    let mut store = TaskStore::with_key(db, KEY);
    let d = day("2024-02-05");
    let ids: Vec<TaskId> = store.get_tasks_for(&d).iter().map(|t| t.id).collect();

    assert!(store.toggle_task(d, ids[0]).unwrap().unwrap().completed);
    assert!(store.remove_task(d, ids[1]).unwrap());

    // The patched ids and the normalized key are now persisted.
    let reloaded = TaskStore::with_key(store.into_backend(), KEY);
    let tasks = reloaded.get_tasks_for(&d);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, ids[0]);
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].id, ids[2]);
    let raw = reloaded.backend().kv_get(KEY).unwrap().unwrap();
    assert!(raw.contains("\"2024-02-05\""));
    assert!(!raw.contains("\"2024-2-5\""));
}

#[test]
fn test_loading_does_not_write() {
    let mut db = Database::open_memory().unwrap();
    let legacy = r#"{"2024-2-5": [{"text": "a"}]}"#;
    db.set(KEY, legacy).unwrap();
    let store = TaskStore::with_key(db, KEY);
    assert_eq!(store.backend().kv_get(KEY).unwrap().as_deref(), Some(legacy));
}

#[test]
fn test_corrupt_blob_loads_empty_and_recovers_on_write() {
    let mut db = Database::open_memory().unwrap();
    db.set(KEY, "{not json").unwrap();

    let mut store = TaskStore::with_key(db, KEY);
    assert!(store.store().is_empty());
    store.add_task(day("2024-02-05"), "fresh start").unwrap();

    let reloaded = TaskStore::with_key(store.into_backend(), KEY);
    assert_eq!(reloaded.get_tasks_for(&day("2024-02-05")).len(), 1);
}

#[test]
fn test_separate_keys_do_not_interfere() {
    let db = Database::open_memory().unwrap();
    let mut garden = TaskStore::with_key(db, KEY);
    garden.add_task(day("2024-02-05"), "garden").unwrap();

    let other = TaskStore::with_key(garden.into_backend(), "otherKey");
    assert!(other.store().is_empty());
}

#[test]
fn test_file_backed_store_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("gardentodo.db");
    let d = day("2024-02-05");

    let id = {
        let mut store = TaskStore::with_key(Database::open_at(&path).unwrap(), KEY);
        store.add_task(d, "persist me").unwrap().unwrap().id
    };

    let store = TaskStore::with_key(Database::open_at(&path).unwrap(), KEY);
    assert_eq!(store.get_tasks_for(&d)[0].id, id);
    assert_eq!(store.get_tasks_for(&d)[0].text, "persist me");
}
