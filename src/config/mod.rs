//! Configuration for the caching layer

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

fn default_ttl_secs() -> u64 {
    300
}

/// Cache layer configuration
///
/// Owned by the host application; [`crate::DataAccessHandler::with_config`]
/// consumes it to build a SQLite-backed handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry TTL in seconds; applies uniformly to every operation
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Cache directory; defaults to the XDG cache location when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            cache_dir: None,
        }
    }
}

impl CacheConfig {
    /// Entry TTL as a [`Duration`]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".bqcache").join("config.yaml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::from)?;
        let config: CacheConfig = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Save(e.to_string()))?;

        std::fs::write(&path, contents).map_err(|e| ConfigError::Save(e.to_string()))?;

        Ok(())
    }
}
