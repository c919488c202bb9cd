//! Aggregate counters over a whole projection.

use cinetrack_models::{MediaKind, WatchStatus};
use serde::Serialize;

use crate::projection::Projection;

/// Assumed length of one series episode; per-episode runtimes are not stored
pub const MINUTES_PER_EPISODE: u64 = 42;

/// Number of genres kept in the histogram
pub const TOP_GENRES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: WatchStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub completed_movie_count: usize,
    pub active_or_completed_series_count: usize,
    pub total_watched_episodes: u64,
    pub total_watched_minutes: u64,
    /// Mean of all scores, one decimal; 0 when nothing is scored
    pub average_score: f64,
    pub genre_histogram: Vec<GenreCount>,
    /// Always four buckets: watching, planned, completed, dropped
    pub status_histogram: Vec<StatusCount>,
}

impl StatsSnapshot {
    /// Watched time as whole days and the remaining whole hours
    pub fn watch_time(&self) -> (u64, u64) {
        let hours = self.total_watched_minutes / 60;
        (hours / 24, hours % 24)
    }
}

pub fn aggregate(projection: &Projection) -> StatsSnapshot {
    let mut completed_movie_count = 0;
    let mut active_or_completed_series_count = 0;
    let mut total_watched_episodes = 0u64;
    let mut total_watched_minutes = 0u64;
    let mut score_sum = 0u64;
    let mut scored = 0u64;
    // Insertion order is kept so equal counts stay in first-seen order
    let mut genres: Vec<GenreCount> = Vec::new();
    let mut status_histogram: Vec<StatusCount> = WatchStatus::ALL
        .iter()
        .map(|&status| StatusCount { status, count: 0 })
        .collect();

    for entry in projection.entries() {
        if let Some(bucket) = status_histogram.iter_mut().find(|b| entry.status == Some(b.status)) {
            bucket.count += 1;
        }

        if let Some(score) = entry.score {
            score_sum += u64::from(score);
            scored += 1;
        }

        match entry.media_kind {
            MediaKind::Movie => {
                if entry.has_status(WatchStatus::Completed) {
                    completed_movie_count += 1;
                    total_watched_minutes += u64::from(entry.runtime.unwrap_or(0));
                }
            }
            MediaKind::Series => {
                if entry.has_status(WatchStatus::Watching) || entry.has_status(WatchStatus::Completed) {
                    active_or_completed_series_count += 1;
                }
                let episodes = u64::from(entry.current_episode.unwrap_or(0));
                total_watched_episodes += episodes;
                total_watched_minutes += episodes * MINUTES_PER_EPISODE;
            }
        }

        for genre in &entry.genres {
            match genres.iter_mut().find(|g| &g.name == genre) {
                Some(existing) => existing.count += 1,
                None => genres.push(GenreCount {
                    name: genre.clone(),
                    count: 1,
                }),
            }
        }
    }

    genres.sort_by(|a, b| b.count.cmp(&a.count));
    genres.truncate(TOP_GENRES);

    let average_score = if scored > 0 {
        (score_sum as f64 / scored as f64 * 10.0).round() / 10.0
    } else {
        0.0
    };

    StatsSnapshot {
        completed_movie_count,
        active_or_completed_series_count,
        total_watched_episodes,
        total_watched_minutes,
        average_score,
        genre_histogram: genres,
        status_histogram,
    }
}
