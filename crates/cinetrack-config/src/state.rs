use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key under which the date of the last season check is kept
pub const LAST_SEASON_CHECK_KEY: &str = "lastSeasonCheckDate";

#[derive(Debug, Serialize, Deserialize, Default)]
struct StateData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Small key/value file for state that belongs to this device, not the account
pub struct LocalStateStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl LocalStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    /// Create the store and load it if the file exists
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let state: StateData = toml::from_str(&content)?;
            self.values = state.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let state = StateData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn get_last_season_check(&self) -> Option<&String> {
        self.get(LAST_SEASON_CHECK_KEY)
    }

    pub fn set_last_season_check(&mut self, day: String) {
        self.set(LAST_SEASON_CHECK_KEY.to_string(), day);
    }
}
