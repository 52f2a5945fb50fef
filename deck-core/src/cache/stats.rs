use deck_types::CacheStats;

/// 缓存计数器
///
/// 与层数据放在同一把锁下，计数与对应的状态变更一起生效。
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CacheCounters {
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
    promotions: u64,
}

impl CacheCounters {
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub(crate) fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    /// 重置所有统计
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn snapshot(&self, size: usize) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size,
            expirations: self.expirations,
            promotions: self.promotions,
        }
    }
}
