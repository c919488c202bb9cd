use async_trait::async_trait;
use cinetrack_config::CatalogConfig;
use cinetrack_models::{Credit, MediaKind, MovieDetail, SearchResult, SeriesDetail};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::catalog::tmdb::api;
use crate::catalog::CatalogClient;
use crate::error::CatalogError;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String, language: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("cinetrack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client: Arc::new(client),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_body(&self, path: &str) -> Result<String, CatalogError> {
        self.get_body_with(path, &[]).await
    }

    /// GET a catalog path and return the raw body of a successful response
    async fn get_body_with(&self, path: &str, params: &[(&str, &str)]) -> Result<String, CatalogError> {
        debug!(operation = "catalog_request", path = path, "Requesting catalog");

        let response = self
            .client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(operation = "catalog_request", path = path, status = status.as_u16(), "Catalog returned an error");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn series_detail(&self, catalog_id: u64) -> Result<SeriesDetail, CatalogError> {
        let body = self.get_body(&format!("/tv/{}", catalog_id)).await?;
        api::parse_series_detail(&body)
    }

    async fn movie_detail(&self, catalog_id: u64) -> Result<MovieDetail, CatalogError> {
        let body = self.get_body(&format!("/movie/{}", catalog_id)).await?;
        api::parse_movie_detail(&body)
    }

    async fn person_credits(&self, person_id: u64) -> Result<Vec<Credit>, CatalogError> {
        let body = self.get_body(&format!("/person/{}/combined_credits", person_id)).await?;
        api::parse_person_credits(&body)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_body_with("/search/multi", &[("query", query)]).await?;
        api::parse_search_results(&body)
    }

    async fn recommendations(&self, kind: MediaKind, catalog_id: u64) -> Result<Vec<SearchResult>, CatalogError> {
        let body = self.get_body(&recommendations_path(kind, catalog_id)).await?;
        api::parse_recommendations(&body, kind)
    }
}

fn recommendations_path(kind: MediaKind, catalog_id: u64) -> String {
    let segment = match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "tv",
    };
    format!("/{}/{}/recommendations", segment, catalog_id)
}
