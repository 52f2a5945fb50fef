//! # Cache Module
//!
//! 卡牌知识的分层缓存。
//!
//! ## 模块结构
//!
//! - `config`: 缓存配置
//! - `entry`: 缓存条目
//! - `tier`: 单层 LRU 存储
//! - `stats`: 命中/未命中/淘汰计数
//! - `tiered`: 三层缓存、晋升与淘汰
//!
//! ## 特性
//!
//! - hot / warm / cold 三层，各自容量与 LRU 淘汰
//! - 基于访问频率的 warm → hot 晋升
//! - TTL 支持 (惰性过期 + 可选后台清理)
//! - 线程安全
//! - 缓存统计

pub mod config;
pub mod entry;
mod stats;
mod tier;
pub mod tiered;

pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use tiered::TieredCache;
