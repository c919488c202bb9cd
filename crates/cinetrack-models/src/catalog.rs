use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields;
use crate::media::MediaKind;

/// Series metadata from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesDetail {
    pub catalog_id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub original_language: Option<String>,
    pub first_air_date: Option<String>,
    pub season_count: u32,
    pub episode_count: u32,
    /// Production status as reported by the catalog (e.g. "Returning Series")
    pub status: Option<String>,
    pub genres: Vec<String>,
}

/// Movie metadata from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub catalog_id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub original_language: Option<String>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
}

/// One movie or series credit from a person's filmography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credit {
    pub catalog_id: u64,
    pub media_kind: MediaKind,
    pub title: String,
    pub character: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: f64,
}

/// A movie or series returned by catalog search or recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub catalog_id: u64,
    pub media_kind: MediaKind,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: f64,
    pub original_language: Option<String>,
}

/// Display fields copied onto a list entry when it is saved.
///
/// This is a cache of catalog data and is not refreshed on render.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub original_language: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub runtime: Option<u32>,
}

impl CatalogSnapshot {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn write_fields(&self, out: &mut Map<String, Value>) {
        out.insert(fields::TITLE.to_string(), Value::from(self.title.clone()));
        out.insert(fields::ORIGINAL_TITLE.to_string(), opt(self.original_title.clone()));
        out.insert(fields::OVERVIEW.to_string(), opt(self.overview.clone()));
        out.insert(fields::POSTER_PATH.to_string(), opt(self.poster_path.clone()));
        out.insert(fields::VOTE_AVERAGE.to_string(), opt(self.vote_average));
        out.insert(fields::ORIGINAL_LANGUAGE.to_string(), opt(self.original_language.clone()));
        out.insert(fields::RELEASE_DATE.to_string(), opt(self.release_date.clone()));
        out.insert(
            fields::GENRES.to_string(),
            Value::Array(self.genres.iter().cloned().map(Value::from).collect()),
        );
        out.insert(fields::RUNTIME.to_string(), opt(self.runtime));
    }
}

pub(crate) fn opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

impl From<&SeriesDetail> for CatalogSnapshot {
    fn from(detail: &SeriesDetail) -> Self {
        Self {
            title: detail.title.clone(),
            original_title: detail.original_title.clone(),
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            vote_average: detail.vote_average,
            original_language: detail.original_language.clone(),
            release_date: detail.first_air_date.clone(),
            genres: detail.genres.clone(),
            runtime: None,
        }
    }
}

impl From<&MovieDetail> for CatalogSnapshot {
    fn from(detail: &MovieDetail) -> Self {
        Self {
            title: detail.title.clone(),
            original_title: detail.original_title.clone(),
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            vote_average: detail.vote_average,
            original_language: detail.original_language.clone(),
            release_date: detail.release_date.clone(),
            genres: detail.genres.clone(),
            runtime: detail.runtime_minutes,
        }
    }
}
