use cinetrack_config::{Config, PathManager};
use cinetrack_core::{DailyGate, FileLastRunStore, ListSynchronizer, Locale, SeasonNotification, SeasonWatcher, Session, SystemClock};
use cinetrack_sources::{create_catalog, open_local_store, CatalogClient, LocalStore};
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Everything a command needs, built from the config file
pub struct AppContext {
    pub config: Config,
    pub paths: PathManager,
    pub store: Arc<LocalStore>,
    pub locale: Locale,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        if !config_file.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Configuration file not found at {}. Run 'cinetrack config init' first.",
                config_file.display()
            ));
        }

        let config = Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate_local()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        paths
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;
        let store = open_local_store(&config, &paths).map_err(|e| color_eyre::eyre::eyre!("{:#}", e))?;
        let locale = Locale::new(config.library.domestic_language.clone());
        debug!("Loaded configuration from {}", config_file.display());

        Ok(Self {
            config,
            paths,
            store,
            locale,
        })
    }

    pub fn session(&self) -> Session {
        Session::new(self.config.session.owner_id.clone())
    }

    pub fn catalog(&self) -> Result<Arc<dyn CatalogClient>> {
        create_catalog(&self.config).map_err(|e| color_eyre::eyre::eyre!("Catalog unavailable: {}", e))
    }

    pub fn synchronizer(&self) -> ListSynchronizer {
        ListSynchronizer::new(self.store.clone(), self.config.store.collection.clone(), self.session())
    }

    pub fn season_watcher(&self, notifications: mpsc::UnboundedSender<SeasonNotification>) -> Result<SeasonWatcher> {
        let last_run = FileLastRunStore::open(self.paths.state_file())
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open local state: {}", e))?;
        let gate = DailyGate::new(Arc::new(SystemClock), Arc::new(last_run));
        Ok(SeasonWatcher::new(
            self.store.clone(),
            self.catalog()?,
            gate,
            self.session(),
            self.config.store.collection.clone(),
            notifications,
        ))
    }
}
