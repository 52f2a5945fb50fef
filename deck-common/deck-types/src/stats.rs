use serde::{Deserialize, Serialize};

/// Snapshot of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Entries resident across all tiers, expired ones included until purged.
    pub size: usize,
    pub expirations: u64,
    pub promotions: u64,
}

impl CacheStats {
    /// `hits / (hits + misses)`, `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64) / (total as f64)
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Entry count per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSizes {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub total: usize,
}

impl TierSizes {
    pub fn new(hot: usize, warm: usize, cold: usize) -> Self {
        Self {
            hot,
            warm,
            cold,
            total: hot + warm + cold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierHealth {
    pub size: usize,
    pub capacity: usize,
    /// 0.0 - 1.0
    pub utilization: f64,
}

impl TierHealth {
    pub fn new(size: usize, capacity: usize) -> Self {
        let utilization = if capacity > 0 {
            (size as f64) / (capacity as f64)
        } else {
            0.0
        };
        Self {
            size,
            capacity,
            utilization,
        }
    }
}

/// Cache health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHealth {
    pub hot: TierHealth,
    pub warm: TierHealth,
    pub cold: TierHealth,
    pub hit_rate: f64,
    /// Hit rate above 50%, or no traffic yet.
    pub is_healthy: bool,
}
