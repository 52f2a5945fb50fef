use async_trait::async_trait;
use deck_traits::{CardStore, StoreError};
use deck_types::{CardRecord, SearchCriteria};
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::fuzzy;

/// Card store held entirely in memory, keyed by lowercase name.
pub struct InMemoryCardStore {
    cards: RwLock<BTreeMap<String, CardRecord>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self {
            cards: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_cards(cards: impl IntoIterator<Item = CardRecord>) -> Self {
        let store = Self::new();
        for card in cards {
            store.insert(card);
        }
        store
    }

    pub fn insert(&self, card: CardRecord) {
        let mut cards = self.cards.write().unwrap_or_else(|e| e.into_inner());
        cards.insert(card.name.to_lowercase(), card);
    }

    pub fn remove(&self, name: &str) -> Option<CardRecord> {
        let mut cards = self.cards.write().unwrap_or_else(|e| e.into_inner());
        cards.remove(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.cards.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CardRecord>, StoreError> {
        let cards = self.cards.read().unwrap_or_else(|e| e.into_inner());
        Ok(cards.get(&name.to_lowercase()).cloned())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CardRecord>, StoreError> {
        let cards = self.cards.read().unwrap_or_else(|e| e.into_inner());
        let matching = cards.values().filter(|card| criteria.matches(card)).cloned();
        Ok(match criteria.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    async fn fuzzy_search(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>, StoreError> {
        let cards = self.cards.read().unwrap_or_else(|e| e.into_inner());
        Ok(fuzzy::rank_candidates(name, cards.values().cloned(), limit))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
