use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tasktrack_core::{
    MemoryKeyValueStore, Notification, NotificationKind, SequentialIdGenerator, Store, StoreState,
    Timestamp,
};

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 4, 10, 9, 30, 0).unwrap()
}

fn notification(id: &str, minutes: i64) -> Notification {
    Notification::new(
        id,
        NotificationKind::Info,
        format!("message {id}"),
        now() + Duration::minutes(minutes),
    )
}

fn store_with(notifications: Vec<Notification>) -> Store<MemoryKeyValueStore> {
    Store::with_state(
        MemoryKeyValueStore::new(),
        Box::new(SequentialIdGenerator::new("n")),
        StoreState {
            notifications: Arc::new(notifications),
            ..StoreState::default()
        },
    )
}

#[test]
fn add_notification_prepends() {
    let mut store = store_with(vec![notification("old", 0)]);

    store.add_notification(notification("new", 5));

    let ids: Vec<&str> = store.notifications().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn mark_as_read_twice_equals_once() {
    let mut once = store_with(vec![notification("a", 0), notification("b", 1)]);
    let mut twice = store_with(vec![notification("a", 0), notification("b", 1)]);

    once.mark_notification_as_read("b");
    twice.mark_notification_as_read("b");
    twice.mark_notification_as_read("b");

    assert_eq!(once.state(), twice.state());
    assert!(once.notifications()[1].read);
    assert!(!once.notifications()[0].read);
}

#[test]
fn mark_unknown_notification_is_noop() {
    let mut store = store_with(vec![notification("a", 0)]);
    let before = store.state().clone();

    store.mark_notification_as_read("zzz");

    assert_eq!(store.state(), &before);
}

#[test]
fn clear_then_add_yields_single_notification() {
    let mut store = store_with(vec![notification("a", 0), notification("b", 1)]);
    let added = notification("c", 2);

    store.clear_notifications();
    store.add_notification(added.clone());

    assert_eq!(store.notifications(), &[added]);
}

#[test]
fn clear_persists_empty_collection() {
    let mut store = store_with(vec![notification("a", 0)]);

    store.clear_notifications();

    let blob = store
        .storage()
        .get(tasktrack_core::StorageKey::Notifications)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(json["items"], serde_json::json!([]));
}
