//! Read-only media catalog client.

pub mod tmdb;

use async_trait::async_trait;
use cinetrack_models::{Credit, MediaKind, MovieDetail, SearchResult, SeriesDetail};

use crate::error::CatalogError;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Series metadata, including the current season count
    async fn series_detail(&self, catalog_id: u64) -> Result<SeriesDetail, CatalogError>;

    async fn movie_detail(&self, catalog_id: u64) -> Result<MovieDetail, CatalogError>;

    /// Movie and series credits of a person that carry a poster
    async fn person_credits(&self, person_id: u64) -> Result<Vec<Credit>, CatalogError>;

    /// Movies and series matching `query`; people are left out
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Titles the catalog recommends for someone who liked `catalog_id`
    async fn recommendations(&self, kind: MediaKind, catalog_id: u64) -> Result<Vec<SearchResult>, CatalogError>;
}
