//! TMDB response shapes and their mapping onto catalog models.

use cinetrack_models::{Credit, MediaKind, MovieDetail, SearchResult, SeriesDetail};
use serde::Deserialize;

use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetail {
    id: u64,
    name: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    original_language: Option<String>,
    first_air_date: Option<String>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    status: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    original_language: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
struct TmdbCombinedCredits {
    #[serde(default)]
    cast: Vec<TmdbCastCredit>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastCredit {
    id: u64,
    media_type: Option<String>,
    // Movies carry title/release_date, series carry name/first_air_date
    title: Option<String>,
    name: Option<String>,
    character: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default)]
    results: Vec<TmdbListItem>,
}

/// Item of a search or recommendation page; the same movie/series split as credits
#[derive(Debug, Deserialize)]
struct TmdbListItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    original_language: Option<String>,
}

impl TmdbListItem {
    fn into_result(self, media_kind: MediaKind) -> SearchResult {
        let original_title = non_empty(self.original_title).or_else(|| non_empty(self.original_name));
        SearchResult {
            catalog_id: self.id,
            media_kind,
            title: non_empty(self.title)
                .or_else(|| non_empty(self.name))
                .or_else(|| original_title.clone())
                .unwrap_or_default(),
            original_title,
            overview: non_empty(self.overview),
            release_date: non_empty(self.release_date).or_else(|| non_empty(self.first_air_date)),
            poster_path: non_empty(self.poster_path),
            vote_average: self.vote_average.unwrap_or(0.0),
            original_language: non_empty(self.original_language),
        }
    }
}

/// TMDB sends "" for unknown strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn genre_names(genres: Vec<TmdbGenre>) -> Vec<String> {
    genres
        .into_iter()
        .filter_map(|g| non_empty(g.name))
        .collect()
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Decode(format!("{}: {}", what, e)))
}

pub fn parse_series_detail(body: &str) -> Result<SeriesDetail, CatalogError> {
    let tv: TmdbTvDetail = decode(body, "tv detail")?;
    let original_title = non_empty(tv.original_name);
    let title = non_empty(tv.name)
        .or_else(|| original_title.clone())
        .unwrap_or_default();

    Ok(SeriesDetail {
        catalog_id: tv.id,
        title,
        original_title,
        overview: non_empty(tv.overview),
        poster_path: non_empty(tv.poster_path),
        vote_average: tv.vote_average,
        original_language: non_empty(tv.original_language),
        first_air_date: non_empty(tv.first_air_date),
        season_count: tv.number_of_seasons.unwrap_or(0),
        episode_count: tv.number_of_episodes.unwrap_or(0),
        status: non_empty(tv.status),
        genres: genre_names(tv.genres),
    })
}

pub fn parse_movie_detail(body: &str) -> Result<MovieDetail, CatalogError> {
    let movie: TmdbMovieDetail = decode(body, "movie detail")?;
    let original_title = non_empty(movie.original_title);
    let title = non_empty(movie.title)
        .or_else(|| original_title.clone())
        .unwrap_or_default();

    Ok(MovieDetail {
        catalog_id: movie.id,
        title,
        original_title,
        overview: non_empty(movie.overview),
        poster_path: non_empty(movie.poster_path),
        vote_average: movie.vote_average,
        original_language: non_empty(movie.original_language),
        release_date: non_empty(movie.release_date),
        runtime_minutes: movie.runtime.filter(|m| *m > 0),
        genres: genre_names(movie.genres),
    })
}

/// Cast credits restricted to movies and series that have a poster
pub fn parse_person_credits(body: &str) -> Result<Vec<Credit>, CatalogError> {
    let credits: TmdbCombinedCredits = decode(body, "combined credits")?;

    Ok(credits
        .cast
        .into_iter()
        .filter_map(|c| {
            let media_kind = match c.media_type.as_deref() {
                Some("movie") => MediaKind::Movie,
                Some("tv") => MediaKind::Series,
                _ => return None,
            };
            let poster_path = non_empty(c.poster_path)?;
            Some(Credit {
                catalog_id: c.id,
                media_kind,
                title: non_empty(c.title).or_else(|| non_empty(c.name)).unwrap_or_default(),
                character: non_empty(c.character),
                release_date: non_empty(c.release_date).or_else(|| non_empty(c.first_air_date)),
                poster_path: Some(poster_path),
                vote_average: c.vote_average.unwrap_or(0.0),
            })
        })
        .collect())
}

/// Multi-search page restricted to movies and series
pub fn parse_search_results(body: &str) -> Result<Vec<SearchResult>, CatalogError> {
    let page: TmdbPage = decode(body, "search results")?;

    Ok(page
        .results
        .into_iter()
        .filter_map(|item| {
            let media_kind = match item.media_type.as_deref() {
                Some("movie") => MediaKind::Movie,
                Some("tv") => MediaKind::Series,
                _ => return None,
            };
            Some(item.into_result(media_kind))
        })
        .collect())
}

/// Recommendation pages omit `media_type`; every item has the kind that was asked for
pub fn parse_recommendations(body: &str, kind: MediaKind) -> Result<Vec<SearchResult>, CatalogError> {
    let page: TmdbPage = decode(body, "recommendations")?;
    Ok(page.results.into_iter().map(|item| item.into_result(kind)).collect())
}
