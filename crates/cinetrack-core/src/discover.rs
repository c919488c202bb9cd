//! Picking something to watch next from the user's own list.

use cinetrack_models::{ListEntry, MediaKind, SearchResult, WatchStatus};
use cinetrack_sources::CatalogClient;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::error::SyncError;
use crate::projection::Projection;

/// Lowest score that makes an entry a recommendation seed on its own
pub const RECOMMENDATION_MIN_SCORE: u8 = 7;

/// Entries of `kind` the user liked or is into: scored 7 or more, watching, or completed
pub fn recommendation_candidates(projection: &Projection, kind: MediaKind) -> Vec<&ListEntry> {
    projection
        .entries()
        .filter(|e| e.media_kind == kind)
        .filter(|e| {
            e.score.is_some_and(|s| s >= RECOMMENDATION_MIN_SCORE)
                || matches!(e.status, Some(WatchStatus::Watching) | Some(WatchStatus::Completed))
        })
        .collect()
}

/// A random recommendation candidate to base suggestions on
pub fn choose_seed<'a, R: Rng + ?Sized>(projection: &'a Projection, kind: MediaKind, rng: &mut R) -> Option<&'a ListEntry> {
    recommendation_candidates(projection, kind).choose(rng).copied()
}

/// A random entry of `kind` that is not completed yet
pub fn random_pick<'a, R: Rng + ?Sized>(projection: &'a Projection, kind: MediaKind, rng: &mut R) -> Option<&'a ListEntry> {
    let fresh: Vec<&ListEntry> = projection
        .entries()
        .filter(|e| e.media_kind == kind && e.status != Some(WatchStatus::Completed))
        .collect();
    fresh.choose(rng).copied()
}

/// Catalog recommendations for one seed entry
pub async fn recommendations_for(catalog: &dyn CatalogClient, seed: &ListEntry) -> Result<Vec<SearchResult>, SyncError> {
    let results = catalog.recommendations(seed.media_kind, seed.catalog_id).await?;
    info!(
        operation = "recommendations",
        catalog_id = seed.catalog_id,
        results = results.len(),
        "Fetched recommendations for {}",
        seed.title
    );
    Ok(results)
}
