pub mod card;
pub mod criteria;
pub mod tier;
pub mod stats;

pub use card::{CardRecord, Color, ParseColorError};
pub use criteria::SearchCriteria;
pub use tier::{CacheTier, InvalidTier, ParseTierError};
pub use stats::{CacheHealth, CacheStats, TierHealth, TierSizes};
