//! # Tiered Cache
//!
//! 三层 (hot / warm / cold) 缓存实现。
//!
//! ## 特性
//!
//! - 每层独立容量、独立 LRU 淘汰，淘汰只发生在写入的那一层
//! - 新数据默认写入 warm，hot 只能通过反复访问晋升获得
//! - 仅 warm → hot 晋升，cold 层条目不会晋升
//! - TTL 惰性检查：访问时发现过期即删除并继续查找下一层
//! - 可选的后台过期清理任务
//!
//! ## 并发
//!
//! 三层与计数器共用一把 `parking_lot::Mutex`。读取、过期判断、晋升都在
//! 同一临界区内完成，两个并发读取不会重复晋升同一条目。方法均为同步方法，
//! 锁不会跨越 `.await`。
//!
//! ## 示例
//!
//! ```rust
//! use deck_core::cache::{CacheConfig, TieredCache};
//! use deck_core::CacheTier;
//!
//! let cache = TieredCache::new(CacheConfig::default().with_promotion_threshold(2));
//! cache.put("lightning bolt", "R".to_string());
//!
//! assert_eq!(cache.get("lightning bolt").as_deref(), Some("R"));
//! assert_eq!(cache.tier_of("lightning bolt"), Some(CacheTier::Warm));
//!
//! cache.get("lightning bolt");
//! assert_eq!(cache.tier_of("lightning bolt"), Some(CacheTier::Hot));
//! ```

use deck_traits::KnowledgeCache;
use deck_types::{CacheHealth, CacheStats, CacheTier, InvalidTier, TierHealth, TierSizes};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::config::CacheConfig;
use super::entry::CacheEntry;
use super::stats::CacheCounters;
use super::tier::TierStore;

/// 单层查找结果
enum Lookup<V> {
    Absent,
    Expired,
    Live { value: V, access_count: u64 },
}

struct CacheState<V> {
    hot: TierStore<V>,
    warm: TierStore<V>,
    cold: TierStore<V>,
    counters: CacheCounters,
}

impl<V: Clone> CacheState<V> {
    fn new(config: &CacheConfig) -> Self {
        Self {
            hot: TierStore::new(CacheTier::Hot, config.hot_max_size),
            warm: TierStore::new(CacheTier::Warm, config.warm_max_size),
            cold: TierStore::new(CacheTier::Cold, config.cold_max_size),
            counters: CacheCounters::default(),
        }
    }

    fn tier(&self, tier: CacheTier) -> &TierStore<V> {
        match tier {
            CacheTier::Hot => &self.hot,
            CacheTier::Warm => &self.warm,
            CacheTier::Cold => &self.cold,
        }
    }

    fn tier_mut(&mut self, tier: CacheTier) -> &mut TierStore<V> {
        match tier {
            CacheTier::Hot => &mut self.hot,
            CacheTier::Warm => &mut self.warm,
            CacheTier::Cold => &mut self.cold,
        }
    }

    fn size(&self) -> usize {
        self.hot.len() + self.warm.len() + self.cold.len()
    }

    fn lookup(&mut self, tier: CacheTier, key: &str) -> Lookup<V> {
        let store = self.tier_mut(tier);
        match store.peek(key).map(CacheEntry::is_expired) {
            None => Lookup::Absent,
            Some(true) => {
                store.remove(key);
                Lookup::Expired
            }
            Some(false) => match store.touch(key) {
                Some(entry) => {
                    entry.record_access();
                    Lookup::Live {
                        value: entry.value().clone(),
                        access_count: entry.access_count(),
                    }
                }
                None => Lookup::Absent,
            },
        }
    }

    /// 写入指定层，先从其他层移除同名键
    fn insert(&mut self, tier: CacheTier, entry: CacheEntry<V>) {
        for other in CacheTier::ALL {
            if other != tier {
                self.tier_mut(other).remove(entry.key());
            }
        }

        if let Some(evicted) = self.tier_mut(tier).insert(entry) {
            self.counters.record_eviction();
            debug!(key = evicted.key(), tier = %tier, "Cache evicted");
        }
    }

    /// warm → hot
    fn promote(&mut self, key: &str) -> bool {
        let Some(entry) = self.warm.remove(key) else {
            return false;
        };

        if let Some(evicted) = self.hot.insert(entry) {
            self.counters.record_eviction();
            debug!(key = evicted.key(), tier = %CacheTier::Hot, "Cache evicted");
        }
        self.counters.record_promotion();
        debug!(key, "Cache entry promoted to hot tier");
        true
    }

    fn has_live(&self, key: &str) -> bool {
        CacheTier::ALL.into_iter().any(|tier| {
            self.tier(tier)
                .peek(key)
                .is_some_and(|entry| !entry.is_expired())
        })
    }

    fn remove_everywhere(&mut self, key: &str) -> usize {
        CacheTier::ALL
            .into_iter()
            .filter(|tier| self.tier_mut(*tier).remove(key).is_some())
            .count()
    }
}

/// 三层缓存
pub struct TieredCache<V> {
    config: CacheConfig,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> TieredCache<V> {
    /// 创建新的分层缓存
    pub fn new(config: CacheConfig) -> Self {
        let state = CacheState::new(&config);
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// 获取缓存值
    ///
    /// 依次检查 hot、warm、cold。过期条目被删除后继续查找下一层；
    /// warm 命中且访问次数达到阈值时晋升到 hot。
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();

        for tier in CacheTier::ALL {
            match state.lookup(tier, key) {
                Lookup::Absent => continue,
                Lookup::Expired => {
                    state.counters.record_expirations(1);
                    debug!(key, tier = %tier, "Expired cache entry purged");
                }
                Lookup::Live { value, access_count } => {
                    if tier == CacheTier::Warm && access_count >= self.config.promotion_threshold {
                        state.promote(key);
                    }
                    state.counters.record_hit();
                    return Some(value);
                }
            }
        }

        state.counters.record_miss();
        None
    }

    /// 写入 warm 层，无 TTL
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_in_tier(key, value, CacheTier::Warm, None);
    }

    /// 写入指定层
    ///
    /// 同名键会先从其他层移除；目标层已满时淘汰该层最久未访问的条目。
    pub fn put_in_tier(&self, key: impl Into<String>, value: V, tier: CacheTier, ttl: Option<Duration>) {
        let entry = CacheEntry::new(key, value, ttl);
        self.state.lock().insert(tier, entry);
    }

    /// 任何层都没有未过期条目时才写入，检查与写入在同一临界区内
    ///
    /// 残留的过期条目会被覆盖。返回是否写入。
    pub fn put_if_absent(
        &self,
        key: impl Into<String>,
        value: V,
        tier: CacheTier,
        ttl: Option<Duration>,
    ) -> bool {
        let key = key.into();
        let mut state = self.state.lock();
        if state.has_live(&key) {
            debug!(key = %key, "Cache write skipped, live entry present");
            return false;
        }
        state.insert(tier, CacheEntry::new(key, value, ttl));
        true
    }

    /// 按层级编号写入 (1 = hot, 2 = warm, 3 = cold)
    pub fn put_in_level(
        &self,
        key: impl Into<String>,
        value: V,
        level: u8,
        ttl: Option<Duration>,
    ) -> std::result::Result<(), InvalidTier> {
        let tier = CacheTier::from_level(level)?;
        self.put_in_tier(key, value, tier, ttl);
        Ok(())
    }

    /// 从所有层移除；有移除时淘汰计数 +1
    pub fn evict(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        let removed = state.remove_everywhere(key);
        if removed > 0 {
            state.counters.record_eviction();
            debug!(key, tiers = removed, "Cache entry evicted");
        }
        removed > 0
    }

    pub fn evict_from_tier(&self, key: &str, tier: CacheTier) -> bool {
        let mut state = self.state.lock();
        let removed = state.tier_mut(tier).remove(key).is_some();
        if removed {
            state.counters.record_eviction();
            debug!(key, tier = %tier, "Cache entry evicted");
        }
        removed
    }

    /// 清空所有层并重置统计，返回移除的条目数
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let removed: usize = CacheTier::ALL
            .into_iter()
            .map(|tier| state.tier_mut(tier).clear())
            .sum();
        state.counters.reset();
        info!(removed, "Cache cleared");
        removed
    }

    /// 清空单层，不影响统计
    pub fn clear_tier(&self, tier: CacheTier) -> usize {
        let removed = self.state.lock().tier_mut(tier).clear();
        info!(removed, tier = %tier, "Cache tier cleared");
        removed
    }

    /// 是否存在未过期的条目。不计入命中统计，不刷新访问顺序。
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().has_live(key)
    }

    /// 键当前所在的层 (包括尚未清理的过期条目)
    pub fn tier_of(&self, key: &str) -> Option<CacheTier> {
        let state = self.state.lock();
        CacheTier::ALL
            .into_iter()
            .find(|tier| state.tier(*tier).contains(key))
    }

    /// 指定层的键，从最近访问到最久未访问
    pub fn keys(&self, tier: CacheTier) -> Vec<String> {
        self.state.lock().tier(tier).keys()
    }

    /// 获取缓存统计快照
    pub fn get_stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.counters.snapshot(state.size())
    }

    pub fn tier_sizes(&self) -> TierSizes {
        let state = self.state.lock();
        TierSizes::new(state.hot.len(), state.warm.len(), state.cold.len())
    }

    /// 主动清理所有层的过期条目
    ///
    /// # 返回
    /// - `usize`: 移除的条目数
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.lock();
        let count: usize = CacheTier::ALL
            .into_iter()
            .map(|tier| state.tier_mut(tier).purge_expired())
            .sum();
        state.counters.record_expirations(count);
        count
    }

    /// 获取缓存健康状态
    pub fn health_check(&self) -> CacheHealth {
        let state = self.state.lock();
        let stats = state.counters.snapshot(state.size());
        let tier_health = |store: &TierStore<V>| TierHealth::new(store.len(), store.capacity());

        CacheHealth {
            hot: tier_health(&state.hot),
            warm: tier_health(&state.warm),
            cold: tier_health(&state.cold),
            hit_rate: stats.hit_rate(),
            // 无访问或命中率 > 50% 视为健康
            is_healthy: stats.total_requests() == 0 || stats.hit_rate() > 0.5,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TieredCache<V> {
    /// 启动后台过期清理任务
    ///
    /// 任务只持有弱引用，缓存被释放后自动退出。
    pub fn spawn_expiry_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // 第一次 tick 立即返回
            timer.tick().await;
            loop {
                timer.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let count = cache.purge_expired();
                if count > 0 {
                    debug!("Removed {} expired cache entries", count);
                }
            }
        })
    }

    /// 配置了 `expiry_sweep_interval` 时启动清理任务
    pub fn start_configured_sweeper(self: &Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        self.config
            .expiry_sweep_interval
            .map(|interval| self.spawn_expiry_sweeper(interval))
    }
}

impl<V: Clone> Default for TieredCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V: Clone + Send + Sync> KnowledgeCache<V> for TieredCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        TieredCache::get(self, key)
    }

    fn contains(&self, key: &str) -> bool {
        TieredCache::contains(self, key)
    }

    fn put(&self, key: String, value: V) {
        TieredCache::put(self, key, value)
    }

    fn put_in_tier(&self, key: String, value: V, tier: CacheTier, ttl: Option<Duration>) {
        TieredCache::put_in_tier(self, key, value, tier, ttl)
    }

    fn put_if_absent(&self, key: String, value: V, tier: CacheTier, ttl: Option<Duration>) -> bool {
        TieredCache::put_if_absent(self, key, value, tier, ttl)
    }

    fn evict(&self, key: &str) -> bool {
        TieredCache::evict(self, key)
    }

    fn evict_from_tier(&self, key: &str, tier: CacheTier) -> bool {
        TieredCache::evict_from_tier(self, key, tier)
    }

    fn clear(&self) -> usize {
        TieredCache::clear(self)
    }

    fn clear_tier(&self, tier: CacheTier) -> usize {
        TieredCache::clear_tier(self, tier)
    }

    fn get_stats(&self) -> CacheStats {
        TieredCache::get_stats(self)
    }

    fn tier_sizes(&self) -> TierSizes {
        TieredCache::tier_sizes(self)
    }
}
