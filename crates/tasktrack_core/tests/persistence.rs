use chrono::{TimeZone, Utc};
use tasktrack_core::store::{seed_notifications, seed_projects, seed_tasks};
use tasktrack_core::{
    KeyValueStore, LoadSource, MemoryKeyValueStore, Notification, NotificationKind, Priority,
    SequentialIdGenerator, SqliteKeyValueStore, StorageKey, Store, Task, TaskStatus, Timestamp,
};

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap()
}

fn open(storage: MemoryKeyValueStore) -> Store<MemoryKeyValueStore> {
    Store::open_with(storage, Box::new(SequentialIdGenerator::new("x")), now())
}

#[test]
fn empty_storage_falls_back_to_seed_data() {
    let store = open(MemoryKeyValueStore::new());

    assert_eq!(store.tasks(), seed_tasks().as_slice());
    assert_eq!(store.projects(), seed_projects().as_slice());
    assert_eq!(store.notifications(), seed_notifications(now()).as_slice());
    assert_eq!(store.load_report().tasks, LoadSource::Seeded);
}

#[test]
fn malformed_notifications_blob_yields_seed_notifications() {
    let storage = MemoryKeyValueStore::new();
    storage.insert(StorageKey::Notifications, "{not json at all");

    let store = open(storage);

    assert_eq!(store.notifications(), seed_notifications(now()).as_slice());
    assert_eq!(store.load_report().notifications, LoadSource::Recovered);
}

#[test]
fn wrong_shape_blob_falls_back_per_collection() {
    let storage = MemoryKeyValueStore::new();
    storage.insert(StorageKey::Tasks, r#"[{"id": 1}]"#);
    storage.insert(StorageKey::Projects, "[]");

    let store = open(storage);

    assert_eq!(store.load_report().tasks, LoadSource::Recovered);
    assert_eq!(store.tasks(), seed_tasks().as_slice());
    assert_eq!(store.load_report().projects, LoadSource::Persisted);
    assert!(store.projects().is_empty());
}

#[test]
fn legacy_bare_array_with_date_only_strings_is_revived() {
    let storage = MemoryKeyValueStore::new();
    storage.insert(
        StorageKey::Tasks,
        r#"[{
            "id": "1",
            "title": "Design System Implementation",
            "description": "",
            "status": "in-progress",
            "priority": "high",
            "dueDate": "2024-04-15",
            "assignee": "Leslie Alexander",
            "tags": ["design"],
            "comments": [{"id": "c1", "text": "hi", "author": "a", "createdAt": "2024-04-02T10:00:00.000Z"}]
        }]"#,
    );

    let store = open(storage);

    let task = &store.tasks()[0];
    assert_eq!(store.load_report().tasks, LoadSource::Persisted);
    assert_eq!(task.due_date, Utc.with_ymd_and_hms(2024, 4, 15, 0, 0, 0).unwrap());
    assert_eq!(task.status, TaskStatus::InProgress);
    let comment = &task.comments.as_ref().unwrap()[0];
    assert_eq!(
        comment.created_at,
        Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap()
    );
}

#[test]
fn mutations_survive_reopen_on_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasktrack.db");

    let mut task = Task::new(
        "new",
        "Write release notes",
        TaskStatus::Todo,
        Priority::Low,
        Utc.timestamp_millis_opt(1_714_000_000_321).unwrap(),
    );
    task.progress = Some(5);
    {
        let mut store = Store::open(SqliteKeyValueStore::open(&path).unwrap());
        store.add_task(task.clone());
        store.delete_task("1");
        store.clear_notifications();
    }

    let reopened = Store::open(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(reopened.load_report().tasks, LoadSource::Persisted);
    assert!(reopened.task("1").is_none());
    assert_eq!(reopened.task("new"), Some(&task));
    assert!(reopened.projects().iter().all(|p| !p.references_task("1")));
    assert!(reopened.notifications().is_empty());
}

#[test]
fn far_future_due_date_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasktrack.db");

    let task = Task::new(
        "far",
        "Archive review",
        TaskStatus::Todo,
        Priority::Low,
        Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap(),
    );
    {
        let mut store = Store::open(SqliteKeyValueStore::open(&path).unwrap());
        store.add_task(task.clone());
    }

    let reopened = Store::open(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(reopened.load_report().tasks, LoadSource::Persisted);
    assert_eq!(reopened.task("far"), Some(&task));
    assert_eq!(reopened.tasks().len(), seed_tasks().len() + 1);
}

#[test]
fn write_failure_keeps_memory_state_and_recovers_later() {
    let storage = MemoryKeyValueStore::new();
    let mut store = open(storage);
    store.storage().set_disabled(true);

    let n = Notification::new("n-1", NotificationKind::Error, "boom", now());
    store.add_notification(n.clone());

    assert_eq!(store.notifications()[0], n);
    assert!(store.is_degraded(StorageKey::Notifications));
    assert!(!store.is_degraded(StorageKey::Tasks));
    assert_eq!(store.storage().get(StorageKey::Notifications), None);

    store.storage().set_disabled(false);
    store.mark_notification_as_read("n-1");

    assert!(!store.is_degraded(StorageKey::Notifications));
    let blob = store.storage().get(StorageKey::Notifications).unwrap();
    assert!(blob.contains("n-1"));
}

#[test]
fn quota_exceeded_is_absorbed() {
    let mut store = open(MemoryKeyValueStore::with_quota(16));

    store.delete_task("1");

    assert!(store.task("1").is_none());
    assert!(store.is_degraded(StorageKey::Tasks));
    assert!(store.is_degraded(StorageKey::Projects));
}

#[test]
fn sqlite_batch_writes_task_and_project_blobs_together() {
    let mut store = Store::open(SqliteKeyValueStore::open_in_memory().unwrap());

    store.delete_task("3");

    let storage = store.storage();
    let tasks = storage.read_raw(StorageKey::Tasks).unwrap().unwrap();
    let projects = storage.read_raw(StorageKey::Projects).unwrap().unwrap();
    assert!(!tasks.contains(r#""id":"3""#));
    let projects_json: serde_json::Value = serde_json::from_str(&projects).unwrap();
    assert_eq!(projects_json["items"][0]["tasks"], serde_json::json!(["1", "4"]));
}
