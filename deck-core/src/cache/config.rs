//! # Cache Configuration
//!
//! 分层缓存配置。
//!
//! ## 配置选项
//!
//! - `hot_max_size`: L1 (hot) 最大条目数
//! - `warm_max_size`: L2 (warm) 最大条目数
//! - `cold_max_size`: L3 (cold) 最大条目数
//! - `promotion_threshold`: warm → hot 晋升所需访问次数
//! - `expiry_sweep_interval`: 后台过期清理间隔 (None = 仅惰性过期)
//!
//! ## 示例
//!
//! ```rust
//! use deck_core::cache::CacheConfig;
//! use deck_core::config::ValidateConfig;
//!
//! let config = CacheConfig::default()
//!     .with_hot_max_size(50)
//!     .with_promotion_threshold(3);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{validation_error, ValidateConfig};
use crate::error::Result;

pub const DEFAULT_HOT_MAX_SIZE: usize = 200;
pub const DEFAULT_WARM_MAX_SIZE: usize = 1_000;
pub const DEFAULT_COLD_MAX_SIZE: usize = 10_000;
pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 5;

/// 单层容量上限
const MAX_TIER_SIZE: usize = 1_000_000;

/// 分层缓存配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// L1 (hot) 最大条目数
    ///
    /// 最小、最快的一层，只接纳频繁访问的条目。
    pub hot_max_size: usize,

    /// L2 (warm) 最大条目数
    ///
    /// 新写入默认落在这一层。
    pub warm_max_size: usize,

    /// L3 (cold) 最大条目数
    ///
    /// 只能显式写入，不会晋升。
    pub cold_max_size: usize,

    /// warm 条目的访问次数达到此值时晋升到 hot
    pub promotion_threshold: u64,

    /// 后台过期清理间隔
    ///
    /// `None` 表示仅在访问时惰性检查 TTL。
    #[serde(with = "optional_secs")]
    pub expiry_sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            hot_max_size: DEFAULT_HOT_MAX_SIZE,
            warm_max_size: DEFAULT_WARM_MAX_SIZE,
            cold_max_size: DEFAULT_COLD_MAX_SIZE,
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
            expiry_sweep_interval: None,
        }
    }
}

impl CacheConfig {
    /// 创建新的缓存配置
    pub fn new(hot_max_size: usize, warm_max_size: usize, cold_max_size: usize) -> Self {
        Self {
            hot_max_size,
            warm_max_size,
            cold_max_size,
            ..Default::default()
        }
    }

    pub fn with_hot_max_size(mut self, size: usize) -> Self {
        self.hot_max_size = size;
        self
    }

    pub fn with_warm_max_size(mut self, size: usize) -> Self {
        self.warm_max_size = size;
        self
    }

    pub fn with_cold_max_size(mut self, size: usize) -> Self {
        self.cold_max_size = size;
        self
    }

    pub fn with_promotion_threshold(mut self, threshold: u64) -> Self {
        self.promotion_threshold = threshold;
        self
    }

    /// 启用后台过期清理
    pub fn with_expiry_sweep(mut self, interval: Duration) -> Self {
        self.expiry_sweep_interval = Some(interval);
        self
    }

    /// 所有层的总容量
    pub fn total_capacity(&self) -> usize {
        self.hot_max_size + self.warm_max_size + self.cold_max_size
    }

    /// 开发环境配置：各层容量较小，便于观察淘汰行为
    pub fn development() -> Self {
        Self {
            hot_max_size: 10,
            warm_max_size: 50,
            cold_max_size: 200,
            promotion_threshold: 2,
            expiry_sweep_interval: None,
        }
    }
}

impl ValidateConfig for CacheConfig {
    fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("hot_max_size", self.hot_max_size),
            ("warm_max_size", self.warm_max_size),
            ("cold_max_size", self.cold_max_size),
        ] {
            if size == 0 {
                return Err(validation_error(format!("{} must be greater than 0", name)));
            }
            if size > MAX_TIER_SIZE {
                return Err(validation_error(format!(
                    "{} is too large (max: {})",
                    name, MAX_TIER_SIZE
                )));
            }
        }

        if self.promotion_threshold == 0 {
            return Err(validation_error("promotion_threshold must be greater than 0"));
        }

        if matches!(self.expiry_sweep_interval, Some(interval) if interval.is_zero()) {
            return Err(validation_error("expiry_sweep_interval must be greater than 0"));
        }

        Ok(())
    }
}

/// `Option<Duration>` as whole seconds.
pub(crate) mod optional_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
