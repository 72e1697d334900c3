//! Server configuration
//!
//! An optional TOML file with a `[rules]` and a `[store]` section. Missing
//! sections and keys take their defaults, so an empty file is valid.
//!
//! ```toml
//! [rules]
//! min_owner_len = 4
//! protected_owner = "Administrador"
//!
//! [store]
//! backend = "sqlite"
//! path = "/var/lib/garage/garage.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use garage_core::{ConfigError, RulesConfig};
use garage_storage::{Backend, StoreConfig};

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Rules(#[from] ConfigError),
}

/// Full server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: RulesConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AppConfigError> {
        let config: Self = toml::from_str(content)?;
        config.rules.check()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AppConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, AppConfigError> {
        match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading configuration");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Point the store at a database file, switching to the sqlite backend
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.backend = Backend::Sqlite;
        self.store.path = path.into();
        self
    }
}
