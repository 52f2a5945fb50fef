use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Cache tier. Level 1 is the smallest and fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// L1
    Hot,
    /// L2, the default landing tier
    Warm,
    /// L3
    Cold,
}

/// Tier level outside `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid cache tier {0}: expected 1 (hot), 2 (warm) or 3 (cold)")]
pub struct InvalidTier(pub u8);

impl CacheTier {
    /// Lookup order: hot, warm, cold.
    pub const ALL: [CacheTier; 3] = [CacheTier::Hot, CacheTier::Warm, CacheTier::Cold];

    pub fn level(self) -> u8 {
        match self {
            CacheTier::Hot => 1,
            CacheTier::Warm => 2,
            CacheTier::Cold => 3,
        }
    }

    pub fn from_level(level: u8) -> Result<Self, InvalidTier> {
        match level {
            1 => Ok(CacheTier::Hot),
            2 => Ok(CacheTier::Warm),
            3 => Ok(CacheTier::Cold),
            other => Err(InvalidTier(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CacheTier::Hot => "hot",
            CacheTier::Warm => "warm",
            CacheTier::Cold => "cold",
        }
    }
}

impl Default for CacheTier {
    fn default() -> Self {
        CacheTier::Warm
    }
}

impl TryFrom<u8> for CacheTier {
    type Error = InvalidTier;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        CacheTier::from_level(level)
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache tier: {0}")]
pub struct ParseTierError(pub String);

impl FromStr for CacheTier {
    type Err = ParseTierError;

    /// Accepts a level (`1`..`3`), a name (`hot`) or an alias (`l1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "hot" | "l1" => Ok(CacheTier::Hot),
            "2" | "warm" | "l2" => Ok(CacheTier::Warm),
            "3" | "cold" | "l3" => Ok(CacheTier::Cold),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}
