//! # Repository Configuration
//!
//! Which tier (and TTL) each access pattern writes into.

use deck_types::CacheTier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::config::optional_secs;
use crate::config::{validation_error, ValidateConfig};
use crate::error::Result;

/// Default number of search results written back to the cache
pub const DEFAULT_SEARCH_CACHE_LIMIT: usize = 10;

/// Default number of concurrent store lookups during preload
pub const DEFAULT_PRELOAD_CONCURRENCY: usize = 8;

/// Where a populated record lands in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationPolicy {
    #[serde(default)]
    pub tier: CacheTier,

    /// Seconds in TOML; absent means no expiry
    #[serde(default, with = "optional_secs")]
    pub ttl: Option<Duration>,
}

impl PopulationPolicy {
    pub fn new(tier: CacheTier, ttl: Option<Duration>) -> Self {
        Self { tier, ttl }
    }
}

impl Default for PopulationPolicy {
    /// Warm tier, no TTL
    fn default() -> Self {
        Self {
            tier: CacheTier::Warm,
            ttl: None,
        }
    }
}

/// Lookup repository configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Exact-name lookups that missed the cache
    pub lookup: PopulationPolicy,

    /// Search results written back opportunistically
    pub search: PopulationPolicy,

    /// Fuzzy search results
    pub fuzzy: PopulationPolicy,

    /// Cache warming
    pub preload: PopulationPolicy,

    /// At most this many leading search results are cached
    pub search_cache_limit: usize,

    /// Concurrent store lookups while preloading
    pub preload_concurrency: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            lookup: PopulationPolicy::default(),
            search: PopulationPolicy::default(),
            fuzzy: PopulationPolicy::default(),
            preload: PopulationPolicy::default(),
            search_cache_limit: DEFAULT_SEARCH_CACHE_LIMIT,
            preload_concurrency: DEFAULT_PRELOAD_CONCURRENCY,
        }
    }
}

impl RepositoryConfig {
    pub fn with_lookup_policy(mut self, policy: PopulationPolicy) -> Self {
        self.lookup = policy;
        self
    }

    pub fn with_search_policy(mut self, policy: PopulationPolicy) -> Self {
        self.search = policy;
        self
    }

    pub fn with_fuzzy_policy(mut self, policy: PopulationPolicy) -> Self {
        self.fuzzy = policy;
        self
    }

    pub fn with_preload_policy(mut self, policy: PopulationPolicy) -> Self {
        self.preload = policy;
        self
    }

    pub fn with_search_cache_limit(mut self, limit: usize) -> Self {
        self.search_cache_limit = limit;
        self
    }

    pub fn with_preload_concurrency(mut self, concurrency: usize) -> Self {
        self.preload_concurrency = concurrency;
        self
    }
}

impl ValidateConfig for RepositoryConfig {
    fn validate(&self) -> Result<()> {
        if self.preload_concurrency == 0 {
            return Err(validation_error("preload_concurrency must be greater than 0"));
        }

        for (name, policy) in [
            ("lookup", &self.lookup),
            ("search", &self.search),
            ("fuzzy", &self.fuzzy),
            ("preload", &self.preload),
        ] {
            if matches!(policy.ttl, Some(ttl) if ttl.is_zero()) {
                return Err(validation_error(format!("{} ttl must be greater than 0", name)));
            }
        }

        Ok(())
    }
}
