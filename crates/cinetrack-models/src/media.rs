use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    #[serde(alias = "tv")]
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Parse a stored or catalog kind. Catalog payloads call series "tv".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "movie" => Some(MediaKind::Movie),
            "series" | "tv" => Some(MediaKind::Series),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaKind::parse(s).ok_or_else(|| format!("Invalid media kind: {}. Use 'movie' or 'series'", s))
    }
}

/// Personal watch status of a list entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    Planned,
    Watching,
    Completed,
    Dropped,
}

impl WatchStatus {
    /// Histogram bucket order used by the statistics view
    pub const ALL: [WatchStatus; 4] = [
        WatchStatus::Watching,
        WatchStatus::Planned,
        WatchStatus::Completed,
        WatchStatus::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Planned => "planned",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
            WatchStatus::Dropped => "dropped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "planned" => Some(WatchStatus::Planned),
            "watching" => Some(WatchStatus::Watching),
            "completed" => Some(WatchStatus::Completed),
            "dropped" => Some(WatchStatus::Dropped),
            _ => None,
        }
    }

    /// Position in the default library ordering (in progress first, finished last)
    pub fn rank(&self) -> u8 {
        match self {
            WatchStatus::Watching => 1,
            WatchStatus::Dropped => 2,
            WatchStatus::Planned => 3,
            WatchStatus::Completed => 4,
        }
    }

    /// A score is only kept for entries the user has finished or given up on
    pub fn accepts_score(&self) -> bool {
        matches!(self, WatchStatus::Completed | WatchStatus::Dropped)
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WatchStatus::parse(s).ok_or_else(|| {
            format!("Invalid status: {}. Use 'planned', 'watching', 'completed' or 'dropped'", s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_accepts_catalog_alias() {
        assert_eq!(MediaKind::parse("tv"), Some(MediaKind::Series));
        assert_eq!(MediaKind::parse(" Movie "), Some(MediaKind::Movie));
        assert_eq!(MediaKind::parse("person"), None);

        let kind: MediaKind = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(kind, MediaKind::Series);
    }

    #[test]
    fn test_status_rank_order() {
        let mut statuses = vec![
            WatchStatus::Completed,
            WatchStatus::Planned,
            WatchStatus::Dropped,
            WatchStatus::Watching,
        ];
        statuses.sort_by_key(|s| s.rank());
        assert_eq!(
            statuses,
            vec![
                WatchStatus::Watching,
                WatchStatus::Dropped,
                WatchStatus::Planned,
                WatchStatus::Completed
            ]
        );
    }

    #[test]
    fn test_accepts_score() {
        assert!(WatchStatus::Completed.accepts_score());
        assert!(WatchStatus::Dropped.accepts_score());
        assert!(!WatchStatus::Planned.accepts_score());
        assert!(!WatchStatus::Watching.accepts_score());
    }
}
