//! 单层存储
//!
//! 基于 `lru::LruCache`：读取命中时刷新顺序，与 `last_accessed` 保持一致，
//! 因此队尾即 `last_accessed` 最旧的条目。

use deck_types::CacheTier;
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

use super::entry::CacheEntry;

pub(crate) struct TierStore<V> {
    tier: CacheTier,
    entries: LruCache<String, CacheEntry<V>>,
}

impl<V> TierStore<V> {
    pub(crate) fn new(tier: CacheTier, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tier,
            entries: LruCache::new(capacity),
        }
    }

    /// 不刷新访问顺序
    pub(crate) fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.peek(key)
    }

    /// 读取并刷新访问顺序，调用方负责 `record_access`
    pub(crate) fn touch(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        self.entries.get_mut(key)
    }

    /// 写入条目；层已满且为新键时先淘汰最久未访问的条目并返回
    pub(crate) fn insert(&mut self, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        let key = entry.key().to_string();
        let mut evicted = None;

        if !self.entries.contains(key.as_str()) && self.entries.len() >= self.capacity() {
            evicted = self.entries.pop_lru().map(|(_, entry)| entry);
        }

        self.entries.put(key, entry);
        evicted
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        self.entries.pop(key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// 清空本层，返回移除的条目数
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// 移除过期的条目
    pub(crate) fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key.as_str());
        }
        if !expired.is_empty() {
            debug!(tier = %self.tier, count = expired.len(), "Purged expired entries");
        }
        expired.len()
    }

    /// 从最近访问到最久未访问
    pub(crate) fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(key: &str) -> CacheEntry<u32> {
        CacheEntry::new(key, 0, None)
    }

    #[test]
    fn test_insert_evicts_least_recently_accessed() {
        let mut tier = TierStore::new(CacheTier::Warm, 2);
        assert!(tier.insert(entry("a")).is_none());
        assert!(tier.insert(entry("b")).is_none());

        // 访问 a，使 b 成为最久未访问
        tier.touch("a").unwrap().record_access();

        let evicted = tier.insert(entry("c")).unwrap();
        assert_eq!(evicted.key(), "b");
        assert!(tier.contains("a"));
        assert!(tier.contains("c"));
        assert_eq!(tier.len(), 2);
    }

    #[test]
    fn test_replace_does_not_evict() {
        let mut tier = TierStore::new(CacheTier::Hot, 1);
        tier.insert(entry("a"));
        assert!(tier.insert(CacheEntry::new("a", 9, None)).is_none());
        assert_eq!(*tier.peek("a").unwrap().value(), 9);
    }

    #[test]
    fn test_peek_does_not_refresh_order() {
        let mut tier = TierStore::new(CacheTier::Cold, 2);
        tier.insert(entry("a"));
        tier.insert(entry("b"));
        tier.peek("a");
        let evicted = tier.insert(entry("c")).unwrap();
        assert_eq!(evicted.key(), "a");
    }

    #[test]
    fn test_purge_expired() {
        let mut tier = TierStore::new(CacheTier::Warm, 10);
        tier.insert(CacheEntry::new("short", 1, Some(Duration::ZERO)));
        tier.insert(entry("forever"));
        assert_eq!(tier.purge_expired(), 1);
        assert_eq!(tier.keys(), vec!["forever".to_string()]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let tier: TierStore<u32> = TierStore::new(CacheTier::Hot, 0);
        assert_eq!(tier.capacity(), 1);
    }
}
