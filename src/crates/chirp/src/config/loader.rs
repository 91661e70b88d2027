//! Configuration loader with dual-location support
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.chirp/chirp.toml
//! 3. Project-level config: ./.chirp/chirp.toml
//! 4. An explicit file passed with `--config`
//!
//! Later configs override earlier ones key by key, so a project file that
//! only sets `llm.model` keeps the user's `llm.base_url`.

use crate::config::schema::ChirpConfig;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use tokio::fs;
use toml::{Table, Value};
use tracing::{debug, info};

const CONFIG_DIR: &str = ".chirp";
const CONFIG_FILE: &str = "chirp.toml";

/// Configuration loader that handles both user and project configs
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
    explicit_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader for the standard locations
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE)),
            project_config_path: std::env::current_dir()
                .ok()
                .map(|cwd| cwd.join(CONFIG_DIR).join(CONFIG_FILE)),
            explicit_path: None,
        }
    }

    /// Loader over arbitrary locations.
    pub fn with_paths(user: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            user_config_path: user,
            project_config_path: project,
            explicit_path: None,
        }
    }

    /// Also load `path`, after the standard locations. It must exist.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Load configuration from all locations, later taking precedence
    ///
    /// Missing standard files are skipped; unreadable or malformed ones are
    /// reported rather than silently ignored.
    pub async fn load(&self) -> Result<ChirpConfig, ConfigError> {
        let mut merged = Table::new();
        info!("Loading configuration with defaults");

        for path in [&self.user_config_path, &self.project_config_path]
            .into_iter()
            .flatten()
        {
            match Self::read_table(path).await? {
                Some(table) => {
                    debug!(path = %path.display(), "Loaded config file");
                    merge_tables(&mut merged, table);
                }
                None => debug!(path = %path.display(), "Config file not found"),
            }
        }

        if let Some(path) = &self.explicit_path {
            let table = Self::read_table(path)
                .await?
                .ok_or_else(|| ConfigError::NotFound(path.clone()))?;
            debug!(path = %path.display(), "Loaded explicit config file");
            merge_tables(&mut merged, table);
        }

        let mut config: ChirpConfig =
            Value::Table(merged)
                .try_into()
                .map_err(|source| ConfigError::Parse {
                    path: self.describe_sources(),
                    source,
                })?;

        // Resolve environment variables
        config.resolve_env_vars();

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Read one file as a TOML table; `None` when it does not exist.
    async fn read_table(path: &Path) -> Result<Option<Table>, ConfigError> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let table: Table = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(table))
    }

    fn describe_sources(&self) -> PathBuf {
        self.explicit_path
            .clone()
            .or_else(|| self.project_config_path.clone())
            .or_else(|| self.user_config_path.clone())
            .unwrap_or_default()
    }

    /// Get user config path
    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    /// Get project config path
    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `overlay` into `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
