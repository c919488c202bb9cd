//! Filtered and ordered views over a projection.
//!
//! Everything here is a pure function of its inputs. Sorting is stable, so
//! entries that tie on the selected key keep projection order.

use cinetrack_models::{ListEntry, MediaKind, WatchStatus};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::locale::Locale;
use crate::projection::Projection;

/// Rank of an entry without a known status in the default ordering
const UNKNOWN_STATUS_RANK: u8 = 99;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Favorites,
    Only(WatchStatus),
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "favorites" | "favourites" => Ok(StatusFilter::Favorites),
            other => WatchStatus::parse(other)
                .map(StatusFilter::Only)
                .ok_or_else(|| format!("Invalid status filter: {}. Use 'all', 'favorites' or a watch status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OriginFilter {
    #[default]
    All,
    Domestic,
    Foreign,
}

impl FromStr for OriginFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(OriginFilter::All),
            "domestic" => Ok(OriginFilter::Domestic),
            "foreign" => Ok(OriginFilter::Foreign),
            _ => Err(format!("Invalid origin: {}. Use 'all', 'domestic' or 'foreign'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Status rank, then title
    #[default]
    Default,
    Score,
    Year,
    AddedAt,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(SortKey::Default),
            "score" => Ok(SortKey::Score),
            "year" => Ok(SortKey::Year),
            "added" | "addedat" | "added_at" => Ok(SortKey::AddedAt),
            _ => Err(format!("Invalid sort: {}. Use 'default', 'score', 'year' or 'added'", s)),
        }
    }
}

/// Conjunctive library filters; unset parts match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFilter {
    pub kind: Option<MediaKind>,
    pub status: StatusFilter,
    pub origin: OriginFilter,
    pub search: Option<String>,
}

impl LibraryFilter {
    pub fn matches(&self, entry: &ListEntry, locale: &Locale) -> bool {
        self.matches_kind(entry)
            && self.matches_status(entry)
            && self.matches_origin(entry, locale)
            && self.matches_search(entry)
    }

    fn matches_kind(&self, entry: &ListEntry) -> bool {
        self.kind.map(|kind| entry.media_kind == kind).unwrap_or(true)
    }

    fn matches_status(&self, entry: &ListEntry) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Favorites => entry.is_favorite,
            StatusFilter::Only(status) => entry.has_status(status),
        }
    }

    fn matches_origin(&self, entry: &ListEntry, locale: &Locale) -> bool {
        let domestic = locale.is_domestic(entry.original_language.as_deref());
        match self.origin {
            OriginFilter::All => true,
            OriginFilter::Domestic => domestic,
            OriginFilter::Foreign => !domestic,
        }
    }

    /// Case-insensitive substring match on title, original title,
    /// "title year" and the release year
    fn matches_search(&self, entry: &ListEntry) -> bool {
        let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) else {
            return true;
        };
        let query = query.to_lowercase();
        let title = entry.title.to_lowercase();
        let original_title = entry.original_title.as_deref().unwrap_or("").to_lowercase();
        let year = entry.release_year();

        title.contains(&query)
            || original_title.contains(&query)
            || format!("{} {}", title, year).contains(&query)
            || year.contains(&query)
    }
}

pub fn compose<'a>(
    projection: &'a Projection,
    filter: &LibraryFilter,
    sort: SortKey,
    locale: &Locale,
) -> Vec<&'a ListEntry> {
    let mut view: Vec<&ListEntry> = projection
        .entries()
        .filter(|entry| filter.matches(entry, locale))
        .collect();
    sort_entries(&mut view, sort, locale);
    view
}

/// Another user's list: only a kind filter, in the default ordering
pub fn compose_shared<'a>(projection: &'a Projection, kind: Option<MediaKind>, locale: &Locale) -> Vec<&'a ListEntry> {
    let filter = LibraryFilter {
        kind,
        ..LibraryFilter::default()
    };
    compose(projection, &filter, SortKey::Default, locale)
}

fn status_rank(entry: &ListEntry) -> u8 {
    entry.status.map(|s| s.rank()).unwrap_or(UNKNOWN_STATUS_RANK)
}

fn sort_entries(view: &mut [&ListEntry], sort: SortKey, locale: &Locale) {
    match sort {
        SortKey::Default => view.sort_by(|a, b| default_order(a, b, locale)),
        SortKey::Score => view.sort_by(|a, b| b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0))),
        SortKey::Year => view.sort_by(|a, b| release_key(b).cmp(release_key(a))),
        SortKey::AddedAt => view.sort_by(|a, b| added_seconds(b).cmp(&added_seconds(a))),
    }
}

fn release_key(entry: &ListEntry) -> &str {
    entry.release_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("0000")
}

fn added_seconds(entry: &ListEntry) -> i64 {
    entry.added_at.map(|at| at.timestamp()).unwrap_or(0)
}

fn default_order(a: &ListEntry, b: &ListEntry, locale: &Locale) -> Ordering {
    status_rank(a)
        .cmp(&status_rank(b))
        .then_with(|| locale.compare(&a.title, &b.title))
}
