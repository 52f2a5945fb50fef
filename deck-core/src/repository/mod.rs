//! # Lookup Repository
//!
//! Single "get card knowledge" surface over a [`KnowledgeCache`] and a
//! [`CardStore`].
//!
//! - `get_by_name`: cache first, store on miss, write back
//! - `search`: always hits the store; leading results are cached if absent
//! - `fuzzy_search`: matching is delegated to the store; every result is cached
//! - `preload_by_names`: warm the cache ahead of traffic
//!
//! Cache calls are synchronous and complete before any store call is awaited,
//! so no cache lock is ever held across store I/O. "Cache if absent" writes go
//! through [`KnowledgeCache::put_if_absent`], which checks and writes under one
//! lock, so an entry written by a concurrent caller is never overwritten.

pub mod policy;

use deck_traits::{CardStore, KnowledgeCache};
use deck_types::{CacheTier, CardRecord, SearchCriteria, TierSizes};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;

pub use policy::{PopulationPolicy, RepositoryConfig};

/// Repository statistics, as exposed to outer layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepositoryStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
    pub evictions: u64,
}

/// Outcome of a preload run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Fetched from the store and cached
    pub loaded: usize,
    /// Skipped, already resident
    pub already_cached: usize,
    /// Names the store does not know
    pub not_found: Vec<String>,
}

/// Canonical cache key for a card name.
pub fn cache_key(name: &str) -> String {
    name.to_lowercase()
}

pub struct LookupRepository {
    cache: Arc<dyn KnowledgeCache<CardRecord>>,
    store: Arc<dyn CardStore>,
    config: RepositoryConfig,
}

impl LookupRepository {
    pub fn new(cache: Arc<dyn KnowledgeCache<CardRecord>>, store: Arc<dyn CardStore>) -> Self {
        Self::with_config(cache, store, RepositoryConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn KnowledgeCache<CardRecord>>,
        store: Arc<dyn CardStore>,
        config: RepositoryConfig,
    ) -> Self {
        Self { cache, store, config }
    }

    pub fn cache(&self) -> &Arc<dyn KnowledgeCache<CardRecord>> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn CardStore> {
        &self.store
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn populate(&self, key: String, card: CardRecord, policy: &PopulationPolicy) {
        self.cache.put_in_tier(key, card, policy.tier, policy.ttl);
    }

    fn populate_if_absent(&self, key: String, card: CardRecord, policy: &PopulationPolicy) -> bool {
        self.cache.put_if_absent(key, card, policy.tier, policy.ttl)
    }

    /// Look up a card by exact name.
    ///
    /// `Ok(None)` when neither the cache nor the store knows the name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<CardRecord>> {
        let key = cache_key(name);
        if let Some(card) = self.cache.get(&key) {
            debug!(name, "Card served from cache");
            return Ok(Some(card));
        }

        let found = self.store.get_by_name(name).await.map_err(|e| {
            warn!(name, store = self.store.name(), "Card store lookup failed: {}", e);
            e
        })?;

        match &found {
            Some(card) => {
                self.populate(key, card.clone(), &self.config.lookup);
                debug!(name, "Card loaded from store and cached");
            }
            None => debug!(name, "Card not found"),
        }
        Ok(found)
    }

    /// Search the store. Results are never served from the cache.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CardRecord>> {
        let results = self.store.search(criteria).await.map_err(|e| {
            warn!(store = self.store.name(), "Card store search failed: {}", e);
            e
        })?;

        let mut cached = 0;
        for card in results.iter().take(self.config.search_cache_limit) {
            if self.populate_if_absent(cache_key(&card.name), card.clone(), &self.config.search) {
                cached += 1;
            }
        }
        debug!(results = results.len(), cached, "Search completed");

        Ok(results)
    }

    /// Approximate name search. Every returned record is cached by its exact name.
    pub async fn fuzzy_search(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>> {
        let results = self.store.fuzzy_search(name, limit).await.map_err(|e| {
            warn!(name, store = self.store.name(), "Card store fuzzy search failed: {}", e);
            e
        })?;

        for card in &results {
            self.populate(cache_key(&card.name), card.clone(), &self.config.fuzzy);
        }
        debug!(name, results = results.len(), "Fuzzy search completed");

        Ok(results)
    }

    /// Fetch every uncached name from the store and cache it.
    ///
    /// The first store failure aborts the preload and is returned; cards
    /// fetched before it stay cached.
    pub async fn preload_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<PreloadReport> {
        let mut report = PreloadReport::default();
        let mut missing: Vec<String> = Vec::new();

        for name in names {
            let name = name.as_ref();
            let key = cache_key(name);
            if self.cache.contains(&key) || missing.iter().any(|m| cache_key(m) == key) {
                report.already_cached += 1;
            } else {
                missing.push(name.to_string());
            }
        }

        let store = Arc::clone(&self.store);
        let mut fetches = stream::iter(missing)
            .map(|name| {
                let store = Arc::clone(&store);
                async move { store.get_by_name(&name).await.map(|card| (name, card)) }
            })
            .buffer_unordered(self.config.preload_concurrency.max(1));

        while let Some((name, card)) = fetches.try_next().await? {
            match card {
                Some(card) => {
                    // 拉取期间可能已被其他调用方写入
                    if self.populate_if_absent(cache_key(&name), card, &self.config.preload) {
                        report.loaded += 1;
                    } else {
                        report.already_cached += 1;
                    }
                }
                None => report.not_found.push(name),
            }
        }

        report.not_found.sort();
        info!(
            loaded = report.loaded,
            already_cached = report.already_cached,
            not_found = report.not_found.len(),
            "Cache preload finished"
        );
        Ok(report)
    }

    pub fn get_stats(&self) -> RepositoryStats {
        let stats = self.cache.get_stats();
        RepositoryStats {
            hits: stats.hits,
            misses: stats.misses,
            size: stats.size,
            hit_rate: stats.hit_rate(),
            evictions: stats.evictions,
        }
    }

    pub fn tier_sizes(&self) -> TierSizes {
        self.cache.tier_sizes()
    }

    /// Drop a card from every tier.
    pub fn evict(&self, name: &str) -> bool {
        self.cache.evict(&cache_key(name))
    }

    /// Drop every cached card and reset counters. Returns the number removed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    pub fn clear_tier(&self, tier: CacheTier) -> usize {
        self.cache.clear_tier(tier)
    }
}
