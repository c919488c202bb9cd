use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{opt, CatalogSnapshot};
use crate::document::Document;
use crate::fields;
use crate::media::{MediaKind, WatchStatus};
use crate::normalize::{
    lookup, normalize_genres, normalize_score, read_bool, read_f64, read_positive_u32, read_score,
    read_string, read_timestamp, read_u32, read_u64,
};

/// A user's personal record for one catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListEntry {
    /// Opaque id assigned by the remote store, used to address mutations
    pub document_id: String,
    pub owner_id: String,
    pub catalog_id: u64,
    pub media_kind: MediaKind,
    /// `None` when the stored value is missing or not a known status
    pub status: Option<WatchStatus>,
    pub score: Option<u8>,
    pub review: Option<String>,
    pub current_season: Option<u32>,
    pub current_episode: Option<u32>,
    /// Last known season count from the catalog; 0 means never synchronized
    pub total_seasons: u32,
    pub total_episodes: Option<u32>,
    pub catalog_status: Option<String>,
    pub is_favorite: bool,
    pub added_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
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

impl ListEntry {
    /// Build an entry from a stored document, defaulting anything malformed.
    ///
    /// Returns `None` only when the document has no usable catalog id, since
    /// such a record cannot be keyed.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let f = &doc.fields;
        let catalog_id = read_u64(lookup(f, fields::CATALOG_ID, fields::LEGACY_CATALOG_ID))?;

        let total_seasons = read_u32(lookup(f, fields::TOTAL_SEASONS, fields::LEGACY_TOTAL_SEASONS));
        let media_kind = read_string(lookup(f, fields::MEDIA_KIND, fields::LEGACY_MEDIA_KIND))
            .and_then(|kind| MediaKind::parse(&kind))
            .unwrap_or(if total_seasons.is_some() {
                MediaKind::Series
            } else {
                MediaKind::Movie
            });

        Some(Self {
            document_id: doc.id.clone(),
            owner_id: read_string(lookup(f, fields::OWNER_ID, fields::LEGACY_OWNER_ID)).unwrap_or_default(),
            catalog_id,
            media_kind,
            status: read_string(f.get(fields::STATUS)).and_then(|s| WatchStatus::parse(&s)),
            score: read_score(f.get(fields::SCORE)),
            review: read_string(f.get(fields::REVIEW)),
            current_season: read_positive_u32(f.get(fields::CURRENT_SEASON)),
            current_episode: read_positive_u32(f.get(fields::CURRENT_EPISODE)),
            total_seasons: total_seasons.unwrap_or(0),
            total_episodes: read_u32(lookup(f, fields::TOTAL_EPISODES, fields::LEGACY_TOTAL_EPISODES)),
            catalog_status: read_string(lookup(f, fields::CATALOG_STATUS, fields::LEGACY_CATALOG_STATUS)),
            is_favorite: read_bool(f.get(fields::IS_FAVORITE)),
            added_at: read_timestamp(f.get(fields::ADDED_AT)),
            updated_at: read_timestamp(lookup(f, fields::UPDATED_AT, fields::LEGACY_UPDATED_AT)),
            title: read_string(lookup(f, fields::TITLE, fields::LEGACY_TITLE)).unwrap_or_default(),
            original_title: read_string(lookup(f, fields::ORIGINAL_TITLE, fields::LEGACY_ORIGINAL_TITLE)),
            overview: read_string(f.get(fields::OVERVIEW)),
            poster_path: read_string(lookup(f, fields::POSTER_PATH, fields::LEGACY_POSTER_PATH)),
            vote_average: read_f64(lookup(f, fields::VOTE_AVERAGE, fields::LEGACY_VOTE_AVERAGE)),
            original_language: read_string(lookup(
                f,
                fields::ORIGINAL_LANGUAGE,
                fields::LEGACY_ORIGINAL_LANGUAGE,
            )),
            release_date: read_string(lookup(f, fields::RELEASE_DATE, fields::LEGACY_RELEASE_DATE)),
            genres: normalize_genres(f.get(fields::GENRES)),
            runtime: read_u32(f.get(fields::RUNTIME)),
        })
    }

    /// Projection key: the catalog id as a string
    pub fn key(&self) -> String {
        self.catalog_id.to_string()
    }

    pub fn is_series(&self) -> bool {
        self.media_kind == MediaKind::Series
    }

    pub fn has_status(&self, status: WatchStatus) -> bool {
        self.status == Some(status)
    }

    /// Year part of the release date, empty when unknown
    pub fn release_year(&self) -> &str {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .unwrap_or("")
    }
}

/// Everything needed to create a new list document
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub catalog_id: u64,
    pub media_kind: MediaKind,
    pub status: WatchStatus,
    pub score: Option<u8>,
    pub review: Option<String>,
    pub current_season: Option<u32>,
    pub current_episode: Option<u32>,
    pub is_favorite: bool,
    pub total_seasons: Option<u32>,
    pub total_episodes: Option<u32>,
    pub catalog_status: Option<String>,
    pub snapshot: CatalogSnapshot,
}

impl EntryDraft {
    pub fn new(catalog_id: u64, media_kind: MediaKind, status: WatchStatus, snapshot: CatalogSnapshot) -> Self {
        Self {
            catalog_id,
            media_kind,
            status,
            score: None,
            review: None,
            current_season: None,
            current_episode: None,
            is_favorite: false,
            total_seasons: None,
            total_episodes: None,
            catalog_status: None,
            snapshot,
        }
    }

    pub fn with_score(mut self, score: Option<u8>) -> Self {
        self.score = score;
        self
    }

    pub fn with_progress(mut self, season: Option<u32>, episode: Option<u32>) -> Self {
        self.current_season = season;
        self.current_episode = episode;
        self
    }

    pub fn with_review(mut self, review: Option<String>) -> Self {
        self.review = review;
        self
    }

    /// Document fields for a fresh record owned by `owner_id`.
    ///
    /// The score is cleared unless the status accepts one, and progress
    /// counters are cleared for movies.
    pub fn into_fields(self, owner_id: &str, now: DateTime<Utc>) -> Map<String, Value> {
        let mut out = Map::new();
        self.snapshot.write_fields(&mut out);

        let is_series = self.media_kind == MediaKind::Series;
        let stamp = timestamp_value(now);

        out.insert(fields::OWNER_ID.to_string(), Value::from(owner_id));
        out.insert(fields::CATALOG_ID.to_string(), Value::from(self.catalog_id));
        out.insert(fields::MEDIA_KIND.to_string(), Value::from(self.media_kind.as_str()));
        out.insert(fields::STATUS.to_string(), Value::from(self.status.as_str()));
        out.insert(fields::SCORE.to_string(), opt(normalize_score(self.status, self.score)));
        out.insert(fields::REVIEW.to_string(), opt(self.review));
        out.insert(
            fields::CURRENT_SEASON.to_string(),
            opt(self.current_season.filter(|_| is_series)),
        );
        out.insert(
            fields::CURRENT_EPISODE.to_string(),
            opt(self.current_episode.filter(|_| is_series)),
        );
        out.insert(
            fields::TOTAL_SEASONS.to_string(),
            opt(self.total_seasons.filter(|_| is_series)),
        );
        out.insert(
            fields::TOTAL_EPISODES.to_string(),
            opt(self.total_episodes.filter(|_| is_series)),
        );
        out.insert(fields::CATALOG_STATUS.to_string(), opt(self.catalog_status));
        out.insert(fields::IS_FAVORITE.to_string(), Value::Bool(self.is_favorite));
        out.insert(fields::ADDED_AT.to_string(), stamp.clone());
        out.insert(fields::UPDATED_AT.to_string(), stamp);
        out
    }
}

pub(crate) fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn document(fields: Value) -> Document {
        Document::new("doc-1", fields.as_object().cloned().unwrap())
    }

    #[test]
    fn test_from_document_reads_current_fields() {
        let doc = document(json!({
            "ownerId": "u1",
            "catalogId": 1399,
            "mediaKind": "series",
            "status": "watching",
            "currentSeason": 3,
            "currentEpisode": 5,
            "totalSeasons": 8,
            "isFavorite": true,
            "title": "Game of Thrones",
            "releaseDate": "2011-04-17",
            "genres": ["Drama", "Sci-Fi & Fantasy"],
            "addedAt": "2024-01-01T10:00:00Z"
        }));

        let entry = ListEntry::from_document(&doc).unwrap();
        assert_eq!(entry.document_id, "doc-1");
        assert_eq!(entry.key(), "1399");
        assert_eq!(entry.media_kind, MediaKind::Series);
        assert_eq!(entry.status, Some(WatchStatus::Watching));
        assert_eq!(entry.current_episode, Some(5));
        assert_eq!(entry.total_seasons, 8);
        assert!(entry.is_favorite);
        assert_eq!(entry.release_year(), "2011");
        assert_eq!(entry.genres.len(), 2);
        assert_eq!(entry.added_at, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).single());
    }

    #[test]
    fn test_from_document_reads_legacy_fields() {
        let doc = document(json!({
            "userId": "u1",
            "tmdbId": "603",
            "type": "tv",
            "name": "Old Show",
            "total_seasons": 2,
            "first_air_date": "1999-03-31",
            "genres": "Drama, Action",
            "status": "somethingelse",
            "addedAt": {"seconds": 1_700_000_000, "nanoseconds": 0}
        }));

        let entry = ListEntry::from_document(&doc).unwrap();
        assert_eq!(entry.owner_id, "u1");
        assert_eq!(entry.catalog_id, 603);
        assert_eq!(entry.media_kind, MediaKind::Series);
        assert_eq!(entry.title, "Old Show");
        assert_eq!(entry.total_seasons, 2);
        assert_eq!(entry.release_date.as_deref(), Some("1999-03-31"));
        assert_eq!(entry.genres, vec!["Drama".to_string(), "Action".to_string()]);
        assert_eq!(entry.status, None);
        assert!(entry.added_at.is_some());
    }

    #[test]
    fn test_from_document_defaults_missing_fields() {
        let entry = ListEntry::from_document(&document(json!({"catalogId": 7}))).unwrap();
        assert_eq!(entry.media_kind, MediaKind::Movie);
        assert_eq!(entry.total_seasons, 0);
        assert_eq!(entry.score, None);
        assert!(!entry.is_favorite);
        assert!(entry.genres.is_empty());
        assert_eq!(entry.release_year(), "");
    }

    #[test]
    fn test_from_document_without_catalog_id_is_rejected() {
        assert!(ListEntry::from_document(&document(json!({"title": "Orphan"}))).is_none());
    }

    #[test]
    fn test_draft_nulls_score_for_planned() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let fields = EntryDraft::new(1, MediaKind::Movie, WatchStatus::Planned, CatalogSnapshot::titled("Heat"))
            .with_score(Some(9))
            .into_fields("u1", now);

        assert_eq!(fields.get("score"), Some(&Value::Null));
        assert_eq!(fields.get("ownerId"), Some(&json!("u1")));
        assert_eq!(fields.get("status"), Some(&json!("planned")));
        assert_eq!(fields.get("addedAt"), fields.get("updatedAt"));
    }

    #[test]
    fn test_draft_keeps_score_for_completed_and_clears_movie_progress() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let fields = EntryDraft::new(1, MediaKind::Movie, WatchStatus::Completed, CatalogSnapshot::titled("Heat"))
            .with_score(Some(9))
            .with_progress(Some(1), Some(1))
            .into_fields("u1", now);

        assert_eq!(fields.get("score"), Some(&json!(9)));
        assert_eq!(fields.get("currentSeason"), Some(&Value::Null));
        assert_eq!(fields.get("currentEpisode"), Some(&Value::Null));
    }

    #[test]
    fn test_draft_round_trips_through_document() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut draft = EntryDraft::new(1399, MediaKind::Series, WatchStatus::Watching, CatalogSnapshot::titled("GoT"))
            .with_progress(Some(2), Some(4));
        draft.total_seasons = Some(8);

        let doc = Document::new("d", draft.into_fields("u1", now));
        let entry = ListEntry::from_document(&doc).unwrap();
        assert_eq!(entry.owner_id, "u1");
        assert_eq!(entry.current_season, Some(2));
        assert_eq!(entry.total_seasons, 8);
        assert_eq!(entry.added_at, Some(now));
    }
}
