pub mod cache;
pub mod store;

pub use cache::KnowledgeCache;
pub use store::{CardStore, StoreError};
