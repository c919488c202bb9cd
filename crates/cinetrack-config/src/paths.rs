use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("CINETRACK_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinetrack");

        Ok(Self::with_base(base_dir))
    }

    /// Config files at `base`, data and logs in subdirectories
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn from_docker_env() -> Self {
        Self::with_base(container_base_path())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Device-local state (last season check date)
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.toml")
    }

    /// Default backing file for the local document store
    pub fn library_file(&self) -> PathBuf {
        self.data_dir.join("library.json")
    }

    pub fn watch_log_file(&self) -> PathBuf {
        self.log_dir.join("cinetrack.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory; its presence means we run in a container
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_layout() {
        let paths = PathManager::with_base(PathBuf::from("/tmp/ct"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/ct/config.toml"));
        assert_eq!(paths.state_file(), PathBuf::from("/tmp/ct/data/state.toml"));
        assert_eq!(paths.library_file(), PathBuf::from("/tmp/ct/data/library.json"));
        assert_eq!(paths.watch_log_file(), PathBuf::from("/tmp/ct/logs/cinetrack.log"));
    }
}
