use cinetrack_sources::{CatalogError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The device-local last-run record could not be read or written
    #[error("last-run state error: {0}")]
    LastRun(String),
}

impl SyncError {
    /// True when a live query was terminated by the store
    pub fn is_subscription(&self) -> bool {
        matches!(self, SyncError::Store(StoreError::Subscription(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Store(StoreError::NotFound { .. }))
    }
}
