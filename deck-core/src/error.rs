//! # Deck Error Types
//!
//! Centralized error handling for the deck core library.

use deck_traits::StoreError;
use deck_types::InvalidTier;
use thiserror::Error;

/// Result type alias for deck operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// Core error types
#[derive(Error, Debug)]
pub enum DeckError {
    /// Tier level outside 1..=3
    #[error(transparent)]
    InvalidTier(#[from] InvalidTier),

    /// Backing store failures, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration errors: unreadable file, bad TOML, failed validation
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DeckError {
    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the error came from the backing store
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
