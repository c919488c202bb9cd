use async_trait::async_trait;
use chrono::Utc;
use cinetrack_models::document::matches_all;
use cinetrack_models::{Document, Predicate};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::{DocumentStore, SnapshotResult, StoreSubscription};

/// Process-local document store with live queries.
///
/// Every accepted write pushes a fresh full snapshot to each live query on
/// the written collection. When opened with a path, the collections are
/// loaded from a JSON file and written back after each mutation.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    path: Option<PathBuf>,
}

#[derive(Default)]
struct State {
    collections: Collections,
    listeners: HashMap<u64, Listener>,
    next_listener_id: u64,
    next_document_seq: u64,
}

struct Listener {
    collection: String,
    predicates: Vec<Predicate>,
    sender: mpsc::UnboundedSender<SnapshotResult>,
}

impl State {
    fn select(&self, collection: &str, predicates: &[Predicate]) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_all(predicates, &doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push the current result set to every listener on `collection`
    fn notify(&mut self, collection: &str) {
        let mut closed = Vec::new();
        for (id, listener) in self.listeners.iter().filter(|(_, l)| l.collection == collection) {
            let snapshot = self.select(collection, &listener.predicates);
            if listener.sender.send(Ok(snapshot)).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            debug!(operation = "store_listener_pruned", listener_id = id, "Removed listener with closed receiver");
            self.listeners.remove(&id);
        }
    }

    fn next_document_id(&mut self, collection: &str) -> String {
        loop {
            self.next_document_seq += 1;
            let candidate = format!("{:x}{:06x}", Utc::now().timestamp_millis(), self.next_document_seq);
            let taken = self
                .collections
                .get(collection)
                .map(|docs| docs.iter().any(|d| d.id == candidate))
                .unwrap_or(false);
            if !taken {
                return candidate;
            }
        }
    }
}

type Collections = BTreeMap<String, Vec<Document>>;

fn find_mut<'a>(collections: &'a mut Collections, collection: &str, document_id: &str) -> Result<&'a mut Document, StoreError> {
    collections
        .get_mut(collection)
        .and_then(|docs| docs.iter_mut().find(|d| d.id == document_id))
        .ok_or_else(|| not_found(collection, document_id))
}

fn not_found(collection: &str, document_id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        document_id: document_id.to_string(),
    }
}

impl LocalStore {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::from_parts(State::default(), None)
    }

    /// Open a file-backed store, loading existing collections if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut state = State::default();

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Persistence(format!("failed to read {}: {}", path.display(), e)))?;
            state.collections = serde_json::from_str(&content)
                .map_err(|e| StoreError::Persistence(format!("failed to parse {}: {}", path.display(), e)))?;
            let total: usize = state.collections.values().map(Vec::len).sum();
            info!("Loaded local store from {} ({} documents)", path.display(), total);
        } else {
            debug!("Local store file {} does not exist yet, starting empty", path.display());
        }

        Ok(Self::from_parts(state, Some(path)))
    }

    fn from_parts(state: State, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                path,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.inner
            .state
            .lock()
            .map_err(|_| StoreError::Transport("local store state is poisoned".to_string()))
    }

    /// Write `collections` to the backing file through a temp file and a rename
    fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Persistence(format!("failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(collections)
            .map_err(|e| StoreError::Persistence(format!("failed to serialize store: {}", e)))?;

        let staging = path.with_extension("json.tmp");
        let written = std::fs::write(&staging, json).and_then(|()| std::fs::rename(&staging, path));
        written.map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            warn!("Failed to write local store file {}: {}", path.display(), e);
            StoreError::Persistence(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Make `candidate` the current state once it is on disk, then push snapshots.
    /// On a failed write nothing changes and nobody is notified.
    fn commit(&self, state: &mut State, collection: &str, candidate: Collections) -> Result<(), StoreError> {
        self.persist(&candidate)?;
        state.collections = candidate;
        state.notify(collection);
        Ok(())
    }

    /// Number of live queries currently registered
    pub fn listener_count(&self) -> usize {
        self.lock().map(|state| state.listeners.len()).unwrap_or(0)
    }

    /// Terminate every live query with a subscription error (e.g. access revoked)
    pub fn revoke_subscriptions(&self, reason: &str) {
        let Ok(mut state) = self.lock() else {
            return;
        };
        let listeners: Vec<Listener> = state.listeners.drain().map(|(_, l)| l).collect();
        warn!(
            operation = "store_subscriptions_revoked",
            count = listeners.len(),
            reason = reason,
            "Terminating live queries"
        );
        for listener in listeners {
            let _ = listener.sender.send(Err(StoreError::Subscription(reason.to_string())));
        }
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn query(&self, collection: &str, predicates: &[Predicate]) -> Result<Vec<Document>, StoreError> {
        let state = self.lock()?;
        Ok(state.select(collection, predicates))
    }

    async fn subscribe(&self, collection: &str, predicates: &[Predicate]) -> Result<StoreSubscription, StoreError> {
        let mut state = self.lock()?;
        state.next_listener_id += 1;
        let id = state.next_listener_id;

        let (sender, receiver) = mpsc::unbounded_channel();
        // Receiver is alive, so the initial push cannot fail
        let _ = sender.send(Ok(state.select(collection, predicates)));

        state.listeners.insert(
            id,
            Listener {
                collection: collection.to_string(),
                predicates: predicates.to_vec(),
                sender,
            },
        );
        debug!(operation = "store_subscribe", listener_id = id, collection = collection, "Live query registered");

        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        Ok(StoreSubscription::new(receiver, move || {
            if let Some(inner) = inner.upgrade() {
                if let Ok(mut state) = inner.state.lock() {
                    if state.listeners.remove(&id).is_some() {
                        debug!(operation = "store_unsubscribe", listener_id = id, "Live query released");
                    }
                }
            }
        }))
    }

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<String, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_document_id(collection);
        let mut candidate = state.collections.clone();
        candidate
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        self.commit(&mut state, collection, candidate)?;
        debug!("Created document {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: &str, document_id: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut candidate = state.collections.clone();
        let doc = find_mut(&mut candidate, collection, document_id)?;
        for (key, value) in fields {
            doc.fields.insert(key, value);
        }
        self.commit(&mut state, collection, candidate)?;
        debug!("Updated document {}/{}", collection, document_id);
        Ok(())
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let mut candidate = state.collections.clone();
        let docs = candidate
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, document_id))?;
        let before = docs.len();
        docs.retain(|d| d.id != document_id);
        if docs.len() == before {
            return Err(not_found(collection, document_id));
        }
        self.commit(&mut state, collection, candidate)?;
        debug!("Deleted document {}/{}", collection, document_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_query_with_predicates() {
        let store = LocalStore::in_memory();
        store.create("lists", fields(json!({"ownerId": "a", "status": "completed"}))).await.unwrap();
        store.create("lists", fields(json!({"ownerId": "a", "status": "planned"}))).await.unwrap();
        store.create("lists", fields(json!({"ownerId": "b", "status": "completed"}))).await.unwrap();

        let owned = store.query("lists", &[Predicate::eq("ownerId", "a")]).await.unwrap();
        assert_eq!(owned.len(), 2);

        let completed = store
            .query("lists", &[Predicate::eq("ownerId", "a"), Predicate::eq("status", "completed")])
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);

        assert!(store.query("other", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_pushes_full_snapshots() {
        let store = LocalStore::in_memory();
        let mut sub = store.subscribe("lists", &[Predicate::eq("ownerId", "a")]).await.unwrap();

        let initial = sub.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        let id = store.create("lists", fields(json!({"ownerId": "a", "title": "One"}))).await.unwrap();
        let after_create = sub.next().await.unwrap().unwrap();
        assert_eq!(after_create.len(), 1);

        // Writes for other owners still push, with the filtered result set
        store.create("lists", fields(json!({"ownerId": "b"}))).await.unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().len(), 1);

        store.update("lists", &id, fields(json!({"title": "Uno"}))).await.unwrap();
        let after_update = sub.next().await.unwrap().unwrap();
        assert_eq!(after_update[0].get("title"), Some(&json!("Uno")));
        assert_eq!(after_update[0].get("ownerId"), Some(&json!("a")));

        store.delete("lists", &id).await.unwrap();
        assert!(sub.next().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropping_subscription_releases_listener() {
        let store = LocalStore::in_memory();
        let sub = store.subscribe("lists", &[]).await.unwrap();
        let other = store.subscribe("lists", &[]).await.unwrap();
        assert_eq!(store.listener_count(), 2);

        drop(sub);
        assert_eq!(store.listener_count(), 1);

        other.unsubscribe();
        assert_eq!(store.listener_count(), 0);

        // Writes after release reach nobody and do not fail
        store.create("lists", fields(json!({"ownerId": "a"}))).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_document() {
        let store = LocalStore::in_memory();
        let err = store.update("lists", "nope", Map::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        store.create("lists", Map::new()).await.unwrap();
        let err = store.delete("lists", "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_revoke_terminates_stream_with_error() {
        let store = LocalStore::in_memory();
        let mut sub = store.subscribe("lists", &[]).await.unwrap();
        let _ = sub.next().await;

        store.revoke_subscriptions("permission denied");

        match sub.next().await {
            Some(Err(StoreError::Subscription(reason))) => assert_eq!(reason, "permission denied"),
            other => panic!("expected subscription error, got {:?}", other),
        }
        assert!(sub.next().await.is_none());
        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_file_backed_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let store = LocalStore::open(&path).unwrap();
        let id = store.create("lists", fields(json!({"ownerId": "a", "catalogId": 1}))).await.unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        let docs = reopened.query("lists", &[]).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].get("catalogId"), Some(&json!(1)));
        assert!(!dir.path().join("library.json.tmp").exists());
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(LocalStore::open(&path), Err(StoreError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_and_subscribers_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let store = LocalStore::open(&path).unwrap();
        let id = store.create("lists", fields(json!({"ownerId": "a", "title": "Kept"}))).await.unwrap();

        let mut sub = store.subscribe("lists", &[]).await.unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().len(), 1);

        // A non-empty directory in place of the file makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        let created = store.create("lists", fields(json!({"ownerId": "a"}))).await;
        assert!(matches!(created, Err(StoreError::Persistence(_))));
        let updated = store.update("lists", &id, fields(json!({"title": "Lost"}))).await;
        assert!(matches!(updated, Err(StoreError::Persistence(_))));
        let deleted = store.delete("lists", &id).await;
        assert!(matches!(deleted, Err(StoreError::Persistence(_))));

        let docs = store.query("lists", &[]).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("title"), Some(&json!("Kept")));
        assert!(!dir.path().join("library.json.tmp").exists());

        // The next snapshot a subscriber sees is the next successful write
        std::fs::remove_dir_all(&path).unwrap();
        store.create("lists", fields(json!({"ownerId": "b"}))).await.unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap().len(), 2);
    }
}
