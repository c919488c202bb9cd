//! Builds the catalog and store clients from configuration.

use anyhow::{Context, Result};
use cinetrack_config::{Config, PathManager};
use std::sync::Arc;
use tracing::info;

use crate::catalog::tmdb::TmdbClient;
use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::store::local::LocalStore;

pub fn create_catalog(config: &Config) -> Result<Arc<dyn CatalogClient>> {
    if !config.is_catalog_configured() {
        return Err(CatalogError::NotConfigured(format!(
            "set catalog.api_key or {}",
            cinetrack_config::CATALOG_API_KEY_ENV
        ))
        .into());
    }
    info!("Using catalog at {} ({})", config.catalog.base_url, config.catalog.language);
    Ok(Arc::new(TmdbClient::from_config(&config.catalog)))
}

pub fn open_local_store(config: &Config, paths: &PathManager) -> Result<Arc<LocalStore>> {
    let path = config
        .store
        .library_file
        .clone()
        .unwrap_or_else(|| paths.library_file());
    let store = LocalStore::open(&path)
        .with_context(|| format!("Failed to open library store at {}", path.display()))?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_catalog_requires_api_key() {
        let config = Config::template("user-1");
        let err = create_catalog(&config).err().unwrap();
        assert!(err.downcast_ref::<CatalogError>().is_some());
    }

    #[test]
    fn test_open_local_store_honors_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::template("user-1");
        config.store.library_file = Some(dir.path().join("custom.json"));
        let paths = PathManager::with_base(dir.path().join("base"));

        let store = open_local_store(&config, &paths).unwrap();
        assert_eq!(store.listener_count(), 0);
    }
}
