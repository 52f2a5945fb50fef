use deck_types::{CacheStats, CacheTier, TierSizes};
use std::time::Duration;

/// Key-value cache consulted before the card store.
///
/// Keys are expected to be normalized by the caller. Implementations are
/// synchronous and must not block on I/O.
pub trait KnowledgeCache<V>: Send + Sync {
    /// Live value for `key`, counting a hit or a miss.
    fn get(&self, key: &str) -> Option<V>;

    /// Whether a live value is resident. Does not touch counters or recency.
    fn contains(&self, key: &str) -> bool;

    /// Insert into the default tier without TTL.
    fn put(&self, key: String, value: V);

    fn put_in_tier(&self, key: String, value: V, tier: CacheTier, ttl: Option<Duration>);

    /// Insert only when no live value is resident in any tier.
    ///
    /// The check and the write are one atomic step. Returns whether the value
    /// was written.
    fn put_if_absent(&self, key: String, value: V, tier: CacheTier, ttl: Option<Duration>) -> bool;

    /// Remove `key` from every tier. Returns whether anything was removed.
    fn evict(&self, key: &str) -> bool;

    fn evict_from_tier(&self, key: &str, tier: CacheTier) -> bool;

    /// Drop every entry and reset counters. Returns the number removed.
    fn clear(&self) -> usize;

    /// Drop every entry of one tier. Returns the number removed.
    fn clear_tier(&self, tier: CacheTier) -> usize;

    fn get_stats(&self) -> CacheStats;

    fn tier_sizes(&self) -> TierSizes;
}
