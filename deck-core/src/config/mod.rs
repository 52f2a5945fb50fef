//! # Deck Configuration
//!
//! 统一配置入口。
//!
//! ## Configuration Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Environment Variables           │
//! │    DECK_CACHE_HOT_MAX_SIZE=100          │
//! ├─────────────────────────────────────────┤
//! │         Config File (deck.toml)         │
//! │    [cache]                              │
//! │    hot_max_size = 100                   │
//! ├─────────────────────────────────────────┤
//! │         Default Values                  │
//! │    impl Default for CacheConfig { .. }  │
//! └─────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod loader;

pub use loader::ConfigLoader;

use crate::cache::CacheConfig;
use crate::error::{DeckError, Result};
use crate::repository::RepositoryConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Tiered cache sizing and promotion
    #[serde(default)]
    pub cache: CacheConfig,

    /// Population policies of the lookup repository
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Card database location
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.repository.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Card database configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file holding imported cards
    pub database_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl ValidateConfig for StoreConfig {
    fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(validation_error("database_path cannot be empty"));
        }
        Ok(())
    }
}

/// `~/.local/share/deck/cards.db` on Linux; falls back to the working directory
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("deck").join("cards.db"))
        .unwrap_or_else(|| PathBuf::from("cards.db"))
}

/// Trait for validating configuration
pub trait ValidateConfig {
    /// Validate configuration values
    fn validate(&self) -> Result<()>;
}

/// Configuration error helper
pub(crate) fn validation_error(msg: impl Into<String>) -> DeckError {
    DeckError::configuration(format!("Validation error: {}", msg.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_types::CacheTier;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.hot_max_size, 200);
        assert!(config.store.database_path.ends_with("cards.db"));
    }

    #[test]
    fn test_validation_error_message() {
        let err = validation_error("hot_max_size cannot be zero");
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation error: hot_max_size cannot be zero"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            hot_max_size = 20

            [repository.lookup]
            tier = "hot"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.hot_max_size, 20);
        assert_eq!(config.cache.warm_max_size, 1_000);
        assert_eq!(config.repository.lookup.tier, CacheTier::Hot);
        assert_eq!(config.repository.search.tier, CacheTier::Warm);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = Config::default();
        config.store.database_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
