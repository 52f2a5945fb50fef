//! # Configuration Loader
//!
//! Loads and merges configuration from multiple sources:
//! 1. Default values (lowest priority)
//! 2. Configuration file (middle priority)
//! 3. Environment variables (highest priority)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{DeckError, Result};

const DEFAULT_ENV_PREFIX: &str = "DECK";

/// Configuration loader with support for file and environment variable overrides
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Path to configuration file
    config_path: PathBuf,

    /// Environment variable prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(DEFAULT_ENV_PREFIX),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new config loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config loader with a specific config file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create a config loader with custom environment prefix
    ///
    /// The config file override is read from `{prefix}_CONFIG`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            config_path: Self::default_config_path(&prefix),
            env_prefix: prefix,
        }
    }

    /// Path the loader reads from
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Get the default configuration file path: `{prefix}_CONFIG`, then
    /// `./deck.toml`, then the user config dir
    fn default_config_path(prefix: &str) -> PathBuf {
        if let Ok(config_path) = env::var(format!("{}_CONFIG", prefix)) {
            return PathBuf::from(config_path);
        }

        let mut possible_paths = vec![PathBuf::from("deck.toml")];
        if let Some(dir) = dirs::config_dir() {
            possible_paths.push(dir.join("deck").join("config.toml"));
        }

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        // 都不存在时返回第一个，load() 会退回默认值
        possible_paths.swap_remove(0)
    }

    /// Load configuration with full hierarchy
    pub fn load(&self) -> Result<Config> {
        // 1. Start with defaults, 2. overlay the file if it exists
        let mut config = if self.config_path.exists() {
            self.load_from_file()?
        } else {
            debug!(
                "Config file '{}' not found, using defaults",
                self.config_path.display()
            );
            Config::default()
        };

        // 3. Environment variables (highest priority)
        self.merge_env_config(&mut config)?;

        // 4. Validate the final configuration
        config.validate().map_err(|e| {
            DeckError::configuration(format!("Configuration validation failed: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from file
    ///
    /// 所有配置段都带 `#[serde(default)]`，缺省字段保持默认值。
    fn load_from_file(&self) -> Result<Config> {
        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            DeckError::configuration(format!(
                "Failed to read config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            DeckError::configuration(format!(
                "Failed to parse config file '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        info!("Loaded configuration from {}", self.config_path.display());
        Ok(config)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}_{}", self.env_prefix, name)).ok()
    }

    fn merge_env_config(&self, config: &mut Config) -> Result<()> {
        // Cache
        if let Some(val) = self.env_var("CACHE_HOT_MAX_SIZE") {
            config.cache.hot_max_size = parse_number(&val, "CACHE_HOT_MAX_SIZE")?;
        }
        if let Some(val) = self.env_var("CACHE_WARM_MAX_SIZE") {
            config.cache.warm_max_size = parse_number(&val, "CACHE_WARM_MAX_SIZE")?;
        }
        if let Some(val) = self.env_var("CACHE_COLD_MAX_SIZE") {
            config.cache.cold_max_size = parse_number(&val, "CACHE_COLD_MAX_SIZE")?;
        }
        if let Some(val) = self.env_var("CACHE_PROMOTION_THRESHOLD") {
            config.cache.promotion_threshold = parse_number(&val, "CACHE_PROMOTION_THRESHOLD")?;
        }
        if let Some(val) = self.env_var("CACHE_EXPIRY_SWEEP_SECS") {
            let secs: u64 = parse_number(&val, "CACHE_EXPIRY_SWEEP_SECS")?;
            // 0 关闭后台清理
            config.cache.expiry_sweep_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        // Repository
        if let Some(val) = self.env_var("REPOSITORY_SEARCH_CACHE_LIMIT") {
            config.repository.search_cache_limit =
                parse_number(&val, "REPOSITORY_SEARCH_CACHE_LIMIT")?;
        }
        if let Some(val) = self.env_var("REPOSITORY_PRELOAD_CONCURRENCY") {
            config.repository.preload_concurrency =
                parse_number(&val, "REPOSITORY_PRELOAD_CONCURRENCY")?;
        }

        // Store
        if let Some(val) = self.env_var("STORE_DATABASE_PATH") {
            config.store.database_path = PathBuf::from(val);
        }

        Ok(())
    }
}

/// Parse a number from an environment value
fn parse_number<T>(s: &str, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.trim().parse::<T>().map_err(|e| {
        DeckError::configuration(format!(
            "Invalid {} '{}': must be a valid number. Error: {}",
            name, s, e
        ))
    })
}
