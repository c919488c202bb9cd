pub mod compose;
pub mod discover;
pub mod error;
pub mod filmography;
pub mod gate;
pub mod locale;
pub mod projection;
pub mod season_watch;
pub mod session;
pub mod stats;
pub mod synchronizer;

#[cfg(test)]
pub(crate) mod testing;

pub use compose::{compose, compose_shared, LibraryFilter, OriginFilter, SortKey, StatusFilter};
pub use discover::{choose_seed, random_pick, recommendation_candidates, recommendations_for, RECOMMENDATION_MIN_SCORE};
pub use error::SyncError;
pub use filmography::{compose_filmography, CreditSort, FilmographyItem};
pub use gate::{day_key, ClockSource, DailyGate, FileLastRunStore, LastRunStore, SystemClock};
pub use locale::Locale;
pub use projection::Projection;
pub use season_watch::{AcceptAction, SeasonCheckReport, SeasonNotification, SeasonWatcher};
pub use session::Session;
pub use stats::{aggregate, GenreCount, StatsSnapshot, StatusCount};
pub use synchronizer::{ListSynchronizer, ProjectionStream, SaveOutcome};
