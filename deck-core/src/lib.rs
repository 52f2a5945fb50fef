//! # Deck Core Library
//!
//! Card knowledge lookup with a three-tier in-memory cache in front of a
//! slower card database.
//!
//! ## Architecture
//!
//! - **Cache**: hot / warm / cold tiers with per-tier LRU, TTL and
//!   frequency-based warm → hot promotion
//! - **Repository**: cache-aside lookup, search, fuzzy search and preload
//!   over any [`CardStore`]
//! - **Config**: defaults → `deck.toml` → `DECK_*` environment overrides
//!
//! ```text
//! caller ──► LookupRepository ──► TieredCache (hot → warm → cold)
//!                   │ miss
//!                   └──────────► CardStore (SQLite / in-memory)
//! ```
//!
//! Shared types and traits live in the `deck-common` crates and are
//! re-exported here.

pub use deck_traits::*;
pub use deck_types::*;

pub mod cache;
pub mod config;
pub mod error;
pub mod repository;

// Test framework with mocks (only for testing)
#[cfg(any(test, feature = "test-utils"))]
pub mod test;
#[cfg(any(test, feature = "test-utils"))]
pub use test::mocks::{MockCallTracker, MockCardStore};

pub use cache::{CacheConfig, TieredCache};
pub use config::{Config, ConfigLoader, ValidateConfig};
pub use error::{DeckError, Result};
pub use repository::{LookupRepository, PopulationPolicy, PreloadReport, RepositoryConfig, RepositoryStats};
