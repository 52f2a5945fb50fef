//! # Mock Implementations
//!
//! 可验证的 Mock 实现，用于单元测试中的依赖隔离。
//!
//! - **调用追踪**: 自动记录所有方法调用
//! - **错误模拟**: 预设下一次调用失败
//! - **并发安全**: 使用内部锁保证线程安全

use async_trait::async_trait;
use deck_traits::{CardStore, StoreError};
use deck_types::{CardRecord, SearchCriteria};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// 调用记录
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// 方法名
    pub method: String,
    /// 参数列表（序列化后）
    pub args: Vec<String>,
    /// 调用时间
    pub timestamp: std::time::Instant,
}

impl CallRecord {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
            timestamp: std::time::Instant::now(),
        }
    }
}

/// Mock 调用追踪器
#[derive(Debug, Default, Clone)]
pub struct MockCallTracker {
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl MockCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录调用
    pub fn record(&self, method: impl Into<String>, args: Vec<String>) {
        self.calls.lock().push(CallRecord::new(method, args));
    }

    /// 获取指定方法的调用记录
    pub fn get_calls_for(&self, method: &str) -> Vec<CallRecord> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// 获取调用次数
    pub fn call_count(&self, method: &str) -> usize {
        self.get_calls_for(method).len()
    }

    /// 断言：方法被调用指定次数
    pub fn assert_call_count(&self, method: &str, expected: usize) {
        let actual = self.call_count(method);
        assert_eq!(
            actual, expected,
            "Expected method '{}' to be called {} times, but was called {} times",
            method, expected, actual
        );
    }

    /// 断言：方法从未被调用
    pub fn assert_not_called(&self, method: &str) {
        self.assert_call_count(method, 0);
    }

    /// 断言：最后一次调用的参数
    pub fn assert_last_call_args(&self, method: &str, expected_args: Vec<&str>) {
        let calls = self.get_calls_for(method);
        let Some(last_call) = calls.last() else {
            panic!("Expected method '{}' to have been called", method);
        };

        let expected: Vec<String> = expected_args.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            last_call.args, expected,
            "Method '{}' was called with unexpected arguments",
            method
        );
    }

    /// 清空调用记录
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// 卡牌库 Mock
///
/// 按小写名称索引；`search` 复用 `SearchCriteria::matches`，
/// `fuzzy_search` 做大小写无关的子串匹配。
#[derive(Debug, Clone, Default)]
pub struct MockCardStore {
    tracker: MockCallTracker,
    cards: Arc<Mutex<BTreeMap<String, CardRecord>>>,
    should_fail_next: Arc<Mutex<Option<StoreError>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: impl IntoIterator<Item = CardRecord>) -> Self {
        let store = Self::new();
        for card in cards {
            store.insert(card);
        }
        store
    }

    pub fn insert(&self, card: CardRecord) {
        self.cards.lock().insert(card.name.to_lowercase(), card);
    }

    pub fn tracker(&self) -> &MockCallTracker {
        &self.tracker
    }

    /// 下一次调用返回指定错误
    pub fn fail_next(&self, error: StoreError) {
        *self.should_fail_next.lock() = Some(error);
    }

    /// 每次调用前等待，模拟慢查询
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    async fn begin(&self, method: &str, args: Vec<String>) -> Result<(), StoreError> {
        self.tracker.record(method, args);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.should_fail_next.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CardStore for MockCardStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CardRecord>, StoreError> {
        self.begin("get_by_name", vec![name.to_string()]).await?;
        Ok(self.cards.lock().get(&name.to_lowercase()).cloned())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CardRecord>, StoreError> {
        self.begin("search", vec![format!("{:?}", criteria)]).await?;
        let cards = self.cards.lock();
        let matching = cards.values().filter(|c| criteria.matches(c)).cloned();
        Ok(match criteria.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn fuzzy_search(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>, StoreError> {
        self.begin("fuzzy_search", vec![name.to_string(), limit.to_string()])
            .await?;
        let needle = name.to_lowercase();
        let cards = self.cards.lock();
        Ok(cards
            .iter()
            .filter(|(key, _)| key.contains(&needle))
            .map(|(_, card)| card.clone())
            .take(limit)
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.tracker.record("health_check", Vec::new());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_tracks_calls() {
        let store = MockCardStore::with_cards([CardRecord::new("Island", "Basic Land — Island")]);
        assert!(store.get_by_name("island").await.unwrap().is_some());
        assert!(store.get_by_name("swamp").await.unwrap().is_none());

        store.tracker().assert_call_count("get_by_name", 2);
        store.tracker().assert_last_call_args("get_by_name", vec!["swamp"]);
        store.tracker().assert_not_called("search");
    }

    #[tokio::test]
    async fn test_mock_fail_next_is_one_shot() {
        let store = MockCardStore::new();
        store.fail_next(StoreError::database("boom"));
        assert!(store.search(&SearchCriteria::new()).await.is_err());
        assert!(store.search(&SearchCriteria::new()).await.is_ok());
    }
}
