use std::time::{Duration, Instant};

/// 缓存条目
///
/// 只属于一个层；晋升是移动而不是复制。
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    key: String,
    value: V,
    /// 写入时间
    cached_at: Instant,
    /// `None` 表示永不过期
    ttl: Option<Duration>,
    /// 访问次数，仅用于晋升判断；重新写入时归零
    access_count: u64,
    /// 最后访问时间 (用于 LRU)
    last_accessed: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(key: impl Into<String>, value: V, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            key: key.into(),
            value,
            cached_at: now,
            ttl,
            access_count: 0,
            last_accessed: now,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn cached_at(&self) -> Instant {
        self.cached_at
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    pub fn last_accessed(&self) -> Instant {
        self.last_accessed
    }

    /// 检查是否过期
    pub fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.age() >= ttl,
            None => false,
        }
    }

    /// 记录访问
    pub fn record_access(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
    }

    /// 获取年龄 (创建时长)
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    /// 获取空闲时间 (未访问时长)
    pub fn idle_time(&self) -> Duration {
        self.last_accessed.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry() {
        let entry = CacheEntry::new("bolt", 3u32, None);
        assert_eq!(entry.key(), "bolt");
        assert_eq!(*entry.value(), 3);
        assert_eq!(entry.access_count(), 0);
        assert_eq!(entry.cached_at(), entry.last_accessed());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_record_access() {
        let mut entry = CacheEntry::new("bolt", (), None);
        let before = entry.last_accessed();
        entry.record_access();
        entry.record_access();
        assert_eq!(entry.access_count(), 2);
        assert!(entry.last_accessed() >= before);
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("bolt", (), Some(Duration::ZERO));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_expiry() {
        let entry = CacheEntry::new("bolt", (), Some(Duration::from_millis(20)));
        assert!(!entry.is_expired());
        std::thread::sleep(Duration::from_millis(30));
        assert!(entry.is_expired());
    }
}
