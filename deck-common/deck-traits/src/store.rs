use async_trait::async_trait;
use deck_types::{CardRecord, SearchCriteria};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

/// Authoritative card database.
///
/// Calls may be slow; callers must not hold cache locks across them.
#[async_trait]
pub trait CardStore: Send + Sync {
    fn name(&self) -> &str;

    /// Exact (case-insensitive) name lookup.
    async fn get_by_name(&self, name: &str) -> Result<Option<CardRecord>, StoreError>;

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CardRecord>, StoreError>;

    /// Approximate name matching, best match first.
    async fn fuzzy_search(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>, StoreError>;

    async fn health_check(&self) -> bool;
}
