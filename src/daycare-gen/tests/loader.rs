use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use daycare_gen::error::Error;
use daycare_gen::error::Result;
use daycare_gen::loader::Config;
use daycare_gen::loader::Loader;
use daycare_gen::records::Event;
use daycare_gen::store::MemoryStore;
use daycare_gen::store::Store;
use daycare_gen::COLLECTION_CHILDREN;
use daycare_gen::COLLECTION_EVENTS;
use daycare_gen::COLLECTION_STAFF;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

fn config(children: usize, staff: usize, per_child: usize) -> Config {
    Config {
        num_children: children,
        num_staff: staff,
        events_per_child: per_child,
        batch_size: 4,
        generate_old_events: false,
        now: now(),
    }
}

fn ids(store: &MemoryStore, collection: &str) -> HashSet<ObjectId> {
    store
        .documents(collection)
        .unwrap()
        .iter()
        .map(|d| d.get_object_id("_id").unwrap())
        .collect()
}

fn events(store: &MemoryStore) -> Vec<Event> {
    store
        .documents(COLLECTION_EVENTS)
        .unwrap()
        .into_iter()
        .map(|d| bson::from_document(d).unwrap())
        .collect()
}

#[tokio::test]
async fn test_two_children_one_staff() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let mut loader = Loader::new(config(2, 1, 5), store.clone(), StdRng::seed_from_u64(42));
    let summary = loader.run().await?;

    assert_eq!(summary.children, 2);
    assert_eq!(summary.staff, 1);
    assert_eq!(summary.events, 10);
    assert_eq!(summary.batches, 3);
    assert_eq!(store.len(COLLECTION_CHILDREN).unwrap(), 2);
    assert_eq!(store.len(COLLECTION_STAFF).unwrap(), 1);

    let staff_id = *ids(&store, COLLECTION_STAFF).iter().next().unwrap();
    let child_ids = ids(&store, COLLECTION_CHILDREN);
    let events = events(&store);
    assert_eq!(events.len(), 10);
    for event in &events {
        assert_eq!(event.staff_id, staff_id);
        assert!(child_ids.contains(&event.child_id));
    }

    Ok(())
}

#[tokio::test]
async fn test_recent_only_window() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let mut loader = Loader::new(config(5, 3, 40), store.clone(), StdRng::seed_from_u64(7));
    loader.run().await?;

    let from = now() - Duration::days(30);
    for event in events(&store) {
        assert!(event.timestamp >= from && event.timestamp <= now());
    }

    Ok(())
}

#[tokio::test]
async fn test_old_and_recent_windows() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let mut cfg = config(5, 3, 40);
    cfg.generate_old_events = true;
    let mut loader = Loader::new(cfg, store.clone(), StdRng::seed_from_u64(7));
    let summary = loader.run().await?;
    assert_eq!(summary.events, 2 * 5 * 40);

    let boundary = now() - Duration::days(30);
    let earliest = now() - Duration::days(600);
    let (old, recent): (Vec<Event>, Vec<Event>) = events(&store)
        .into_iter()
        .partition(|e| e.timestamp < boundary);

    assert_eq!(old.len(), 200);
    assert_eq!(recent.len(), 200);
    assert!(old.iter().all(|e| e.timestamp >= earliest));
    assert!(recent.iter().all(|e| e.timestamp <= now()));

    let child_ids = ids(&store, COLLECTION_CHILDREN);
    let staff_ids = ids(&store, COLLECTION_STAFF);
    for event in old.iter().chain(recent.iter()) {
        assert!(child_ids.contains(&event.child_id));
        assert!(staff_ids.contains(&event.staff_id));
    }

    Ok(())
}

#[tokio::test]
async fn test_no_staff() {
    let store = Arc::new(MemoryStore::new());
    let mut loader = Loader::new(config(1, 0, 1), store.clone(), StdRng::seed_from_u64(1));
    assert!(matches!(loader.run().await, Err(Error::NoStaff)));
    assert_eq!(store.len(COLLECTION_EVENTS).unwrap(), 0);
}

/// Fails the n-th call to `insert_many`, delegating the rest.
struct FailingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl Store for FailingStore {
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<ObjectId>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == self.fail_on {
            return Err(Error::Internal("bulk insert failed".to_string()));
        }
        self.inner.insert_many(collection, docs).await
    }
}

#[tokio::test]
async fn test_failed_batch_aborts_run() {
    // children, staff, batch 1, batch 2 (fails), batch 3 never sent
    let store = Arc::new(FailingStore {
        inner: MemoryStore::new(),
        calls: AtomicUsize::new(0),
        fail_on: 3,
    });
    let mut loader = Loader::new(config(2, 1, 5), store.clone(), StdRng::seed_from_u64(3));

    assert!(matches!(loader.run().await, Err(Error::Internal(_))));
    assert_eq!(store.calls.load(Ordering::SeqCst), 4);
    assert_eq!(store.inner.len(COLLECTION_EVENTS).unwrap(), 4);
}

#[tokio::test]
async fn test_zero_batch_size() {
    let store = Arc::new(MemoryStore::new());
    let mut cfg = config(1, 1, 1);
    cfg.batch_size = 0;
    let mut loader = Loader::new(cfg, store.clone(), StdRng::seed_from_u64(3));

    assert!(matches!(loader.run().await, Err(Error::InvalidBatchSize)));
    assert_eq!(store.len(COLLECTION_CHILDREN).unwrap(), 0);
}
