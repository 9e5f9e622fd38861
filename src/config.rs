//! Storefront configuration
//!
//! ```yaml
//! currency: CAD
//! log_level: debug
//! menu: fixtures/menu/kitchen.yml
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::menu::fixtures::{FixtureError, find_currency};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The currency code is not supported
    #[error(transparent)]
    Currency(#[from] FixtureError),
}

/// Settings shared by every storefront command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// ISO currency code for display.
    pub currency: String,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Menu fixture to load.
    pub menu: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: "CAD".to_string(),
            log_level: "info".to_string(),
            menu: None,
        }
    }
}

impl StorefrontConfig {
    /// Parse configuration from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or has unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    ///
    /// Relative `menu` paths are resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_yaml_str(&fs::read_to_string(path)?)?;

        let relative_menu = config.menu.as_mut().filter(|menu| menu.is_relative());

        if let (Some(menu), Some(dir)) = (relative_menu, path.parent()) {
            *menu = dir.join(&*menu);
        }

        Ok(config)
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] if the code is not supported.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        Ok(find_currency(&self.currency)?)
    }
}
