#![allow(clippy::unwrap_used)]
// Subscription behaviour of InventoryStore.

use futures_util::StreamExt;

use rackwise_core::{InventoryStore, NewDevice, RackPath};

#[tokio::test]
async fn test_changed_yields_committed_state() {
    let store = InventoryStore::in_memory();
    let mut stream = store.subscribe();
    assert!(stream.current().data_centers().is_empty());

    let dc = store.add_data_center("DC-1").unwrap();
    let snap = stream.changed().await.unwrap();
    assert_eq!(snap.data_center(&dc).unwrap().name, "DC-1");
    assert_eq!(stream.current().data_centers().len(), 1);
}

#[tokio::test]
async fn test_failed_mutation_does_not_notify() {
    let store = InventoryStore::in_memory();
    let mut versions = store.subscribe_version();

    let missing = RackPath::new("dc-x", "room-x", "rack-x");
    assert!(store.add_device(&missing, 1, NewDevice::new("d", 1)).is_err());
    assert!(!versions.has_changed().unwrap());

    store.add_data_center("DC-1").unwrap();
    assert!(versions.has_changed().unwrap());
    assert_eq!(*versions.borrow_and_update(), 1);
}

#[tokio::test]
async fn test_stream_starts_with_current_snapshot() {
    let store = InventoryStore::in_memory();
    store.add_data_center("DC-1").unwrap();

    let mut stream = store.subscribe().into_stream();
    let first = stream.next().await.unwrap();
    assert_eq!(first.data_centers().len(), 1);

    store.add_data_center("DC-2").unwrap();
    let second = stream.next().await.unwrap();
    assert_eq!(second.data_centers().len(), 2);
}

#[tokio::test]
async fn test_changed_returns_none_after_store_drop() {
    let store = InventoryStore::in_memory();
    let mut stream = store.subscribe();
    drop(store);
    assert!(stream.changed().await.is_none());
}

#[test]
fn test_latest_reflects_commits_without_waiting() {
    let store = InventoryStore::in_memory();
    let stream = store.subscribe();
    store.add_data_center("DC-1").unwrap();
    assert!(stream.current().data_centers().is_empty());
    assert_eq!(stream.latest().data_centers().len(), 1);
    tokio_test::assert_ok!(store.add_data_center("DC-2"));
}
