//! Business rule configuration
//!
//! Every constant the rules depend on (minimum lengths, color palette,
//! protected owner, notification brand, year window and denylist) lives here
//! so deployments can override it from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading rule configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// An allowed color with the spellings accepted for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    /// Canonical name, shown to users when a color is rejected
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ColorEntry {
    pub fn new<I, S>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Names this entry answers to: the canonical name followed by its aliases
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Configuration for structural validation and delete protection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub min_plate_len: usize,
    pub min_brand_len: usize,
    pub min_model_year_len: usize,
    pub min_owner_len: usize,
    /// Allowed color palette
    pub colors: Vec<ColorEntry>,
    /// Owner whose records cannot be deleted
    pub protected_owner: String,
    /// Brand that triggers a registration notification
    pub notify_brand: String,
    /// Oldest accepted model year, relative to the current year
    pub max_vehicle_age_years: u32,
    /// Newest accepted model year, relative to the current year
    pub future_model_years: u32,
    /// Substrings rejected in the lower-cased concatenation of all fields
    pub denylist: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_plate_len: 3,
            min_brand_len: 3,
            min_model_year_len: 3,
            min_owner_len: 5,
            colors: default_colors(),
            protected_owner: "Administrador".to_string(),
            notify_brand: "Ferrari".to_string(),
            max_vehicle_age_years: 20,
            future_model_years: 1,
            denylist: default_denylist(),
        }
    }
}

fn default_colors() -> Vec<ColorEntry> {
    vec![
        ColorEntry::new("Red", ["Rojo"]),
        ColorEntry::new("White", ["Blanco"]),
        ColorEntry::new("Black", ["Negro"]),
        ColorEntry::new("Blue", ["Azul"]),
        ColorEntry::new("Gray", ["Gris"]),
    ]
}

fn default_denylist() -> Vec<String> {
    [
        ";", "--", "/*", "*/", " drop ", " insert ", " delete ", " update ", " select ",
        " or 1=1",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl RulesConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject configurations the rules cannot work with
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.colors.iter().any(|c| c.name.trim().is_empty()) {
            return Err(ConfigError::Invalid("color names must not be blank".to_string()));
        }
        if self.denylist.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "denylist patterns must not be empty".to_string(),
            ));
        }
        if self.protected_owner.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "protected_owner must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Canonical color names in configured order
    pub fn color_names(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.name.clone()).collect()
    }
}
