use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides `catalog.api_key`
pub const CATALOG_API_KEY_ENV: &str = "CINETRACK_CATALOG_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

/// Upper bound for `season_watch.poll_interval_minutes` (one week)
pub const MAX_POLL_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub season_watch: SeasonWatchConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Backing file for the local store; defaults to `<data>/library.json`
    #[serde(default)]
    pub library_file: Option<PathBuf>,
}

/// The signed-in user for this device
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Original language that counts as "domestic" in the origin filter
    #[serde(default = "default_domestic_language")]
    pub domestic_language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeasonWatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
    /// How often `watch` re-evaluates the daily gate
    #[serde(default = "default_poll_interval_minutes")]
    pub poll_interval_minutes: u64,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "tr-TR".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_collection() -> String {
    "user_lists".to_string()
}

fn default_domestic_language() -> String {
    "tr".to_string()
}

fn default_poll_interval_minutes() -> u64 {
    60
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            library_file: None,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            domestic_language: default_domestic_language(),
        }
    }
}

impl Default for SeasonWatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            run_on_startup: true,
            poll_interval_minutes: default_poll_interval_minutes(),
        }
    }
}

impl SeasonWatchConfig {
    /// Poll period for `watch`, clamped to 1..=MAX_POLL_INTERVAL_MINUTES minutes
    pub fn poll_interval(&self) -> Duration {
        let minutes = self.poll_interval_minutes.clamp(1, MAX_POLL_INTERVAL_MINUTES);
        Duration::from_secs(minutes * 60)
    }
}

impl Config {
    /// Starter config written by `config init`
    pub fn template(owner_id: impl Into<String>) -> Self {
        Self {
            catalog: CatalogConfig::default(),
            store: StoreConfig::default(),
            session: SessionConfig {
                owner_id: owner_id.into(),
            },
            library: LibraryConfig::default(),
            season_watch: SeasonWatchConfig::default(),
        }
    }

    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(CATALOG_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.catalog.api_key = key;
            }
        }
    }

    pub fn is_catalog_configured(&self) -> bool {
        !self.catalog.api_key.trim().is_empty() && self.catalog.api_key != API_KEY_PLACEHOLDER
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_local()?;
        if !self.is_catalog_configured() {
            return Err(anyhow::anyhow!(
                "catalog.api_key is not configured (set it in config.toml or {})",
                CATALOG_API_KEY_ENV
            ));
        }
        if !self.catalog.base_url.starts_with("http://") && !self.catalog.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("catalog.base_url must be an http(s) URL: {}", self.catalog.base_url));
        }
        Ok(())
    }

    /// Checks for everything that works without the catalog
    pub fn validate_local(&self) -> anyhow::Result<()> {
        if self.session.owner_id.trim().is_empty() {
            return Err(anyhow::anyhow!("session.owner_id is required and cannot be empty"));
        }
        if self.store.collection.trim().is_empty() {
            return Err(anyhow::anyhow!("store.collection cannot be empty"));
        }
        let minutes = self.season_watch.poll_interval_minutes;
        if minutes == 0 || minutes > MAX_POLL_INTERVAL_MINUTES {
            return Err(anyhow::anyhow!(
                "season_watch.poll_interval_minutes must be between 1 and {}, got {}",
                MAX_POLL_INTERVAL_MINUTES,
                minutes
            ));
        }
        Ok(())
    }
}
