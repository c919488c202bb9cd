pub mod config;
pub mod paths;
pub mod state;

pub use config::{CatalogConfig, Config, LibraryConfig, SeasonWatchConfig, SessionConfig, StoreConfig, CATALOG_API_KEY_ENV, MAX_POLL_INTERVAL_MINUTES};
pub use paths::{container_base_path, PathManager};
pub use state::{LocalStateStore, LAST_SEASON_CHECK_KEY};
