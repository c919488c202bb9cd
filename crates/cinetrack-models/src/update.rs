use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::catalog::opt;
use crate::entry::{timestamp_value, ListEntry};
use crate::fields;
use crate::media::{MediaKind, WatchStatus};
use crate::normalize::normalize_score;

/// Partial update of an existing list document.
///
/// Only fields that are set are written, plus `updatedAt`. Score and
/// progress are written together with a status, so the tolerant-write rule
/// (score only for completed/dropped) can be applied against it; a score
/// without a status is discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub status: Option<WatchStatus>,
    pub score: Option<u8>,
    pub review: Option<String>,
    pub current_season: Option<u32>,
    pub current_episode: Option<u32>,
    pub total_seasons: Option<u32>,
    pub is_favorite: Option<bool>,
}

impl EntryUpdate {
    /// The edit form: status with its score, review and progress
    pub fn edit(
        status: WatchStatus,
        score: Option<u8>,
        review: Option<String>,
        current_season: Option<u32>,
        current_episode: Option<u32>,
    ) -> Self {
        Self {
            status: Some(status),
            score,
            review,
            current_season,
            current_episode,
            ..Self::default()
        }
    }

    /// The edit form prefilled from `entry`; arguments that are set replace the stored value
    pub fn edit_of(
        entry: &ListEntry,
        status: Option<WatchStatus>,
        score: Option<u8>,
        review: Option<String>,
        current_season: Option<u32>,
        current_episode: Option<u32>,
    ) -> Self {
        Self::edit(
            status.or(entry.status).unwrap_or(WatchStatus::Planned),
            score.or(entry.score),
            review.or_else(|| entry.review.clone()),
            current_season.or(entry.current_season),
            current_episode.or(entry.current_episode),
        )
    }

    /// Record a new season-count baseline
    pub fn season_baseline(total_seasons: u32) -> Self {
        Self {
            total_seasons: Some(total_seasons),
            ..Self::default()
        }
    }

    /// Put a series back on the planned list after a new season appeared
    pub fn accept_new_season(total_seasons: u32) -> Self {
        Self {
            status: Some(WatchStatus::Planned),
            total_seasons: Some(total_seasons),
            ..Self::default()
        }
    }

    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    pub fn into_fields(self, media_kind: MediaKind, now: DateTime<Utc>) -> Map<String, Value> {
        let mut out = Map::new();

        if let Some(status) = self.status {
            let is_series = media_kind == MediaKind::Series;
            out.insert(fields::STATUS.to_string(), Value::from(status.as_str()));
            out.insert(fields::SCORE.to_string(), opt(normalize_score(status, self.score)));
            if self.review.is_some() {
                out.insert(fields::REVIEW.to_string(), opt(self.review));
            }
            if self.current_season.is_some() || self.current_episode.is_some() || !is_series {
                out.insert(
                    fields::CURRENT_SEASON.to_string(),
                    opt(self.current_season.filter(|_| is_series)),
                );
                out.insert(
                    fields::CURRENT_EPISODE.to_string(),
                    opt(self.current_episode.filter(|_| is_series)),
                );
            }
        }

        if let Some(total) = self.total_seasons {
            out.insert(fields::TOTAL_SEASONS.to_string(), Value::from(total));
        }
        if let Some(favorite) = self.is_favorite {
            out.insert(fields::IS_FAVORITE.to_string(), Value::Bool(favorite));
        }

        out.insert(fields::UPDATED_AT.to_string(), timestamp_value(now));
        out
    }
}
