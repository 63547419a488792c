//! Configuration management for gomarket

pub mod schema;

pub use schema::{Config, PersistMode};

use crate::error::{MarketError, MarketResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gomarket")
            .join("config.toml")
    }

    /// Get the default state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gomarket")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> MarketResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> MarketResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| MarketError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| MarketError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> MarketResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            MarketError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> MarketResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MarketError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk locations for cart state and the audit log
#[derive(Debug, Clone)]
pub struct StatePaths {
    root: PathBuf,
    store_override: Option<PathBuf>,
}

impl StatePaths {
    /// Resolve paths under `root`, honoring `store.dir` from config
    pub fn new(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            store_override: config.store.dir.clone(),
        }
    }

    /// Resolve paths under the default state directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(ConfigManager::state_dir(), config)
    }

    /// Directory holding the key-value store files
    pub fn store_dir(&self) -> PathBuf {
        self.store_override
            .clone()
            .unwrap_or_else(|| self.root.join("store"))
    }

    /// Audit log path
    pub fn audit_log(&self) -> PathBuf {
        self.root.join("audit.log")
    }

    /// Ensure all state directories exist.
    ///
    /// The default store directory is made private. A `store.dir` override
    /// keeps its existing permissions; it is only tightened when this call
    /// creates it.
    pub async fn ensure(&self) -> MarketResult<()> {
        let store_dir = self.store_dir();
        let owned = self.store_override.is_none()
            || !fs::try_exists(&store_dir).await.unwrap_or(false);

        for dir in [&self.root, &store_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                MarketError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        // Cart contents are per-user
        #[cfg(unix)]
        if owned {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            fs::set_permissions(&store_dir, perms)
                .await
                .map_err(|e| MarketError::io("setting store dir permissions", e))?;
        }
        #[cfg(not(unix))]
        let _ = owned;

        Ok(())
    }
}
