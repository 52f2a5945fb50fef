pub mod fuzzy;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryCardStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCardStore;

use deck_traits::StoreError;
use deck_types::CardRecord;
use std::path::Path;

/// Read a JSON array of cards from disk.
pub fn load_cards_json(path: impl AsRef<Path>) -> Result<Vec<CardRecord>, StoreError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        StoreError::serialization(format!(
            "Failed to parse card file '{}': {}",
            path.display(),
            e
        ))
    })
}
