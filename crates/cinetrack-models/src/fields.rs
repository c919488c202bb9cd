//! Field names used in stored list documents.
//!
//! Older documents were written with catalog-style names; the `LEGACY_*`
//! constants are only consulted when reading.

pub const OWNER_ID: &str = "ownerId";
pub const CATALOG_ID: &str = "catalogId";
pub const MEDIA_KIND: &str = "mediaKind";
pub const STATUS: &str = "status";
pub const SCORE: &str = "score";
pub const REVIEW: &str = "review";
pub const CURRENT_SEASON: &str = "currentSeason";
pub const CURRENT_EPISODE: &str = "currentEpisode";
pub const TOTAL_SEASONS: &str = "totalSeasons";
pub const TOTAL_EPISODES: &str = "totalEpisodes";
pub const CATALOG_STATUS: &str = "catalogStatus";
pub const IS_FAVORITE: &str = "isFavorite";
pub const ADDED_AT: &str = "addedAt";
pub const UPDATED_AT: &str = "updatedAt";

pub const TITLE: &str = "title";
pub const ORIGINAL_TITLE: &str = "originalTitle";
pub const OVERVIEW: &str = "overview";
pub const POSTER_PATH: &str = "posterPath";
pub const VOTE_AVERAGE: &str = "voteAverage";
pub const ORIGINAL_LANGUAGE: &str = "originalLanguage";
pub const RELEASE_DATE: &str = "releaseDate";
pub const GENRES: &str = "genres";
pub const RUNTIME: &str = "runtime";

pub const LEGACY_OWNER_ID: &[&str] = &["userId"];
pub const LEGACY_CATALOG_ID: &[&str] = &["tmdbId", "id"];
pub const LEGACY_MEDIA_KIND: &[&str] = &["type", "media_type"];
pub const LEGACY_TOTAL_SEASONS: &[&str] = &["total_seasons"];
pub const LEGACY_TOTAL_EPISODES: &[&str] = &["total_episodes"];
pub const LEGACY_CATALOG_STATUS: &[&str] = &["status_original"];
pub const LEGACY_UPDATED_AT: &[&str] = &["lastUpdated"];
pub const LEGACY_TITLE: &[&str] = &["name"];
pub const LEGACY_ORIGINAL_TITLE: &[&str] = &["original_title", "original_name"];
pub const LEGACY_POSTER_PATH: &[&str] = &["poster_path"];
pub const LEGACY_VOTE_AVERAGE: &[&str] = &["vote_average"];
pub const LEGACY_ORIGINAL_LANGUAGE: &[&str] = &["original_language"];
pub const LEGACY_RELEASE_DATE: &[&str] = &["release_date", "first_air_date"];
