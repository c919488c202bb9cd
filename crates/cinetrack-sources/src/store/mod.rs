//! Remote collection client contract.
//!
//! A store offers one-shot queries, live queries that push the *full*
//! current result set on every change, and addressed writes. A write
//! returning `Ok` means the store accepted it, not that every subscriber
//! has already seen it.

pub mod local;

use async_trait::async_trait;
use cinetrack_models::{Document, Predicate};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::StoreError;

/// One push from a live query: the complete result set, or the error that ended the stream
pub type SnapshotResult = Result<Vec<Document>, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(&self, collection: &str, predicates: &[Predicate]) -> Result<Vec<Document>, StoreError>;

    /// Start a live query. The current result set is delivered first.
    async fn subscribe(&self, collection: &str, predicates: &[Predicate]) -> Result<StoreSubscription, StoreError>;

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<String, StoreError>;

    /// Shallow-merge `fields` into an existing document
    async fn update(&self, collection: &str, document_id: &str, fields: Map<String, Value>) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, document_id: &str) -> Result<(), StoreError>;
}

/// Handle to a live query.
///
/// Dropping the handle (or calling [`StoreSubscription::unsubscribe`])
/// releases the listener in the store; no further snapshots are delivered.
pub struct StoreSubscription {
    receiver: mpsc::UnboundedReceiver<SnapshotResult>,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl StoreSubscription {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<SnapshotResult>,
        release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Wait for the next snapshot. `None` once the store has closed the stream.
    pub async fn next(&mut self) -> Option<SnapshotResult> {
        self.receiver.recv().await
    }

    pub fn unsubscribe(mut self) {
        self.release_listener();
    }

    fn release_listener(&mut self) {
        self.receiver.close();
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        self.release_listener();
    }
}
