//! Keeps a local projection of the signed-in user's list in step with the store.
//!
//! Writes go straight to the store and never touch a projection; the next
//! pushed snapshot is what makes them visible.

use chrono::Utc;
use cinetrack_models::{fields, CatalogSnapshot, EntryDraft, EntryUpdate, ListEntry, MediaKind};
use cinetrack_sources::{CatalogClient, DocumentStore, StoreSubscription};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::projection::Projection;
use crate::session::{owner_predicate, Session};

/// What `save` did with the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Updated(String),
    /// The stored entry had a different media kind and was recreated
    Replaced(String),
}

pub struct ListSynchronizer {
    store: Arc<dyn DocumentStore>,
    catalog: Option<Arc<dyn CatalogClient>>,
    collection: String,
    session: Session,
}

impl ListSynchronizer {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>, session: Session) -> Self {
        Self {
            store,
            catalog: None,
            collection: collection.into(),
            session,
        }
    }

    /// Use the catalog to refresh denormalized fields when saving
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start a live projection of the session owner's list
    pub async fn subscribe(&self) -> Result<ProjectionStream, SyncError> {
        let subscription = self
            .store
            .subscribe(&self.collection, &[self.session.owner_predicate()])
            .await?;
        info!(
            operation = "list_subscribe",
            owner_id = self.session.owner_id(),
            collection = %self.collection,
            "Subscribed to list"
        );
        Ok(ProjectionStream {
            subscription,
            owner_id: self.session.owner_id().to_string(),
        })
    }

    /// One-shot projection of the session owner's list
    pub async fn load(&self) -> Result<Projection, SyncError> {
        self.load_owner(self.session.owner_id()).await
    }

    /// One-shot projection of another user's list
    pub async fn fetch_shared(&self, owner_id: &str) -> Result<Projection, SyncError> {
        self.load_owner(owner_id).await
    }

    async fn load_owner(&self, owner_id: &str) -> Result<Projection, SyncError> {
        let documents = self
            .store
            .query(&self.collection, &[owner_predicate(owner_id)])
            .await?;
        debug!("Loaded {} list documents for {}", documents.len(), owner_id);
        Ok(Projection::from_documents(&documents))
    }

    pub async fn create(&self, draft: EntryDraft) -> Result<String, SyncError> {
        let catalog_id = draft.catalog_id;
        let record = draft.into_fields(self.session.owner_id(), Utc::now());
        let document_id = self.store.create(&self.collection, record).await?;
        info!(operation = "list_create", catalog_id = catalog_id, document_id = %document_id, "Added list entry");
        Ok(document_id)
    }

    pub async fn update(&self, document_id: &str, media_kind: MediaKind, update: EntryUpdate) -> Result<(), SyncError> {
        let patch = update.into_fields(media_kind, Utc::now());
        self.store.update(&self.collection, document_id, patch).await?;
        debug!(operation = "list_update", document_id = document_id, "Updated list entry");
        Ok(())
    }

    pub async fn remove(&self, document_id: &str) -> Result<(), SyncError> {
        self.store.delete(&self.collection, document_id).await?;
        info!(operation = "list_remove", document_id = document_id, "Removed list entry");
        Ok(())
    }

    /// Save a draft under its natural key.
    ///
    /// An existing entry for the same catalog id is updated in place; its
    /// favorite flag and add time are kept. A kind change recreates the entry.
    pub async fn save(&self, projection: &Projection, draft: EntryDraft) -> Result<SaveOutcome, SyncError> {
        let draft = self.refresh_from_catalog(draft).await;

        let Some(existing) = projection.get(draft.catalog_id) else {
            return self.create(draft).await.map(SaveOutcome::Created);
        };

        if existing.media_kind != draft.media_kind {
            info!(
                operation = "list_replace",
                catalog_id = draft.catalog_id,
                from = %existing.media_kind,
                to = %draft.media_kind,
                "Media kind changed, recreating entry"
            );
            let mut draft = draft;
            draft.is_favorite = existing.is_favorite;
            self.remove(&existing.document_id).await?;
            return self.create(draft).await.map(SaveOutcome::Replaced);
        }

        let mut patch = draft.into_fields(self.session.owner_id(), Utc::now());
        patch.remove(fields::ADDED_AT);
        patch.remove(fields::IS_FAVORITE);
        // A failed catalog refresh must not wipe the stored baseline
        for key in [fields::TOTAL_SEASONS, fields::TOTAL_EPISODES, fields::CATALOG_STATUS] {
            if patch.get(key) == Some(&Value::Null) {
                patch.remove(key);
            }
        }

        self.store
            .update(&self.collection, &existing.document_id, patch)
            .await?;
        info!(operation = "list_save", document_id = %existing.document_id, "Updated existing list entry");
        Ok(SaveOutcome::Updated(existing.document_id.clone()))
    }

    /// Fill catalog-owned fields; a catalog failure leaves the draft as given
    async fn refresh_from_catalog(&self, mut draft: EntryDraft) -> EntryDraft {
        let Some(catalog) = &self.catalog else {
            return draft;
        };

        match draft.media_kind {
            MediaKind::Series => match catalog.series_detail(draft.catalog_id).await {
                Ok(detail) => {
                    draft.total_seasons = Some(detail.season_count);
                    draft.total_episodes = Some(detail.episode_count);
                    draft.catalog_status = detail.status.clone();
                    draft.snapshot = CatalogSnapshot::from(&detail);
                }
                Err(e) => {
                    warn!(
                        operation = "catalog_refresh",
                        catalog_id = draft.catalog_id,
                        category = e.category(),
                        "Saving without catalog details: {}",
                        e
                    );
                }
            },
            MediaKind::Movie => match catalog.movie_detail(draft.catalog_id).await {
                Ok(detail) => {
                    draft.snapshot = CatalogSnapshot::from(&detail);
                }
                Err(e) => {
                    warn!(
                        operation = "catalog_refresh",
                        catalog_id = draft.catalog_id,
                        category = e.category(),
                        "Saving without catalog details: {}",
                        e
                    );
                }
            },
        }
        draft
    }

    pub async fn toggle_favorite(&self, entry: &ListEntry) -> Result<bool, SyncError> {
        let favorite = !entry.is_favorite;
        self.update(&entry.document_id, entry.media_kind, EntryUpdate::favorite(favorite))
            .await?;
        Ok(favorite)
    }

    /// Delete the entry stored under `catalog_id`; `false` if there is none
    pub async fn remove_by_catalog_id(&self, projection: &Projection, catalog_id: u64) -> Result<bool, SyncError> {
        match projection.get(catalog_id) {
            Some(entry) => {
                self.remove(&entry.document_id).await?;
                Ok(true)
            }
            None => {
                debug!("No list entry for catalog id {}, nothing to remove", catalog_id);
                Ok(false)
            }
        }
    }
}

/// Live projection of one user's list.
///
/// Each item is a full replacement for the previous one. Dropping the
/// stream (or calling [`ProjectionStream::unsubscribe`]) releases the
/// underlying store listener.
pub struct ProjectionStream {
    subscription: StoreSubscription,
    owner_id: String,
}

impl ProjectionStream {
    /// Next projection, or the error that ended the stream.
    ///
    /// Errors are not retried; `None` follows once the stream has ended.
    pub async fn next(&mut self) -> Option<Result<Projection, SyncError>> {
        match self.subscription.next().await? {
            Ok(documents) => Some(Ok(Projection::from_documents(&documents))),
            Err(e) => {
                warn!(
                    operation = "list_subscription_error",
                    owner_id = %self.owner_id,
                    "List subscription ended: {}",
                    e
                );
                Some(Err(e.into()))
            }
        }
    }

    pub fn unsubscribe(self) {
        info!(operation = "list_unsubscribe", owner_id = %self.owner_id, "Unsubscribed from list");
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests;
