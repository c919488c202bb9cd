//! Fakes shared by the unit tests in this crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use cinetrack_models::{Credit, MediaKind, MovieDetail, SearchResult, SeriesDetail};
use cinetrack_sources::{CatalogClient, CatalogError};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::SyncError;
use crate::gate::{ClockSource, LastRunStore};

#[derive(Default)]
pub(crate) struct FakeCatalog {
    series: HashMap<u64, u32>,
    movies: HashMap<u64, u32>,
    credits: Vec<Credit>,
    titles: Vec<SearchResult>,
    recommended: HashMap<u64, Vec<SearchResult>>,
    failing: HashSet<u64>,
    calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_series(mut self, catalog_id: u64, season_count: u32) -> Self {
        self.series.insert(catalog_id, season_count);
        self
    }

    pub fn with_movie(mut self, catalog_id: u64, runtime: u32) -> Self {
        self.movies.insert(catalog_id, runtime);
        self
    }

    pub fn with_credits(mut self, credits: Vec<Credit>) -> Self {
        self.credits = credits;
        self
    }

    /// Titles returned by `search` when their title contains the query
    pub fn with_titles(mut self, titles: Vec<SearchResult>) -> Self {
        self.titles = titles;
        self
    }

    pub fn with_recommendations(mut self, catalog_id: u64, results: Vec<SearchResult>) -> Self {
        self.recommended.insert(catalog_id, results);
        self
    }

    pub fn failing(mut self, catalog_id: u64) -> Self {
        self.failing.insert(catalog_id);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, catalog_id: u64) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&catalog_id) {
            return Err(CatalogError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found() -> CatalogError {
    CatalogError::Status {
        status: 404,
        body: String::new(),
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn series_detail(&self, catalog_id: u64) -> Result<SeriesDetail, CatalogError> {
        self.check(catalog_id)?;
        let season_count = *self.series.get(&catalog_id).ok_or_else(not_found)?;
        Ok(SeriesDetail {
            catalog_id,
            title: format!("Series {}", catalog_id),
            original_title: None,
            overview: None,
            poster_path: None,
            vote_average: None,
            original_language: Some("en".to_string()),
            first_air_date: Some("2020-01-01".to_string()),
            season_count,
            episode_count: season_count * 10,
            status: Some("Returning Series".to_string()),
            genres: vec!["Drama".to_string()],
        })
    }

    async fn movie_detail(&self, catalog_id: u64) -> Result<MovieDetail, CatalogError> {
        self.check(catalog_id)?;
        let runtime = *self.movies.get(&catalog_id).ok_or_else(not_found)?;
        Ok(MovieDetail {
            catalog_id,
            title: format!("Movie {}", catalog_id),
            original_title: None,
            overview: None,
            poster_path: None,
            vote_average: None,
            original_language: Some("en".to_string()),
            release_date: Some("2019-05-05".to_string()),
            runtime_minutes: Some(runtime),
            genres: vec!["Action".to_string()],
        })
    }

    async fn person_credits(&self, person_id: u64) -> Result<Vec<Credit>, CatalogError> {
        self.check(person_id)?;
        Ok(self.credits.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = query.to_lowercase();
        Ok(self
            .titles
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn recommendations(&self, kind: MediaKind, catalog_id: u64) -> Result<Vec<SearchResult>, CatalogError> {
        self.check(catalog_id)?;
        Ok(self
            .recommended
            .get(&catalog_id)
            .map(|results| results.iter().filter(|r| r.media_kind == kind).cloned().collect())
            .unwrap_or_default())
    }
}

pub(crate) fn search_result(catalog_id: u64, media_kind: MediaKind, title: &str) -> SearchResult {
    SearchResult {
        catalog_id,
        media_kind,
        title: title.to_string(),
        original_title: None,
        overview: None,
        release_date: None,
        poster_path: None,
        vote_average: 0.0,
        original_language: None,
    }
}

pub(crate) struct FixedClock(pub NaiveDate);

impl ClockSource for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct MemoryLastRunStore {
    value: Mutex<Option<String>>,
}

impl MemoryLastRunStore {
    pub fn with_value(day: &str) -> Self {
        Self {
            value: Mutex::new(Some(day.to_string())),
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }
}

impl LastRunStore for MemoryLastRunStore {
    fn last_run(&self) -> Result<Option<String>, SyncError> {
        Ok(self.value.lock().unwrap().clone())
    }

    fn record_run(&self, day: &str) -> Result<(), SyncError> {
        *self.value.lock().unwrap() = Some(day.to_string());
        Ok(())
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
