//! # Deck Test Framework
//!
//! 测试工具：可验证的 Mock 实现。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use deck_core::test::mocks::MockCardStore;
//!
//! let store = MockCardStore::with_cards([CardRecord::new("Lightning Bolt", "Instant")]);
//! // ... 通过 LookupRepository 调用 ...
//! store.tracker().assert_call_count("get_by_name", 1);
//! ```

pub mod mocks;
