use serde::{Deserialize, Serialize};

use crate::card::{CardRecord, Color};

/// Filters for a card search.
///
/// Every filter that is set must match (AND); unset filters match anything.
/// `colors` and `types` require the card to carry *all* listed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub min_cmc: Option<f64>,
    #[serde(default)]
    pub max_cmc: Option<f64>,
    /// Case-insensitive substring of the name or rules text.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self
    }

    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.types.push(card_type.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_cmc_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_cmc = min;
        self.max_cmc = max;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when no filter is set.
    pub fn is_unconstrained(&self) -> bool {
        self.colors.is_empty()
            && self.types.is_empty()
            && self.format.is_none()
            && self.min_cmc.is_none()
            && self.max_cmc.is_none()
            && self.text.is_none()
            && self.rarity.is_none()
    }

    /// Evaluate the filters against a single card. `limit` is not considered.
    pub fn matches(&self, card: &CardRecord) -> bool {
        if !self.colors.iter().all(|c| card.colors.contains(c)) {
            return false;
        }

        let type_line = card.type_line.to_lowercase();
        if !self
            .types
            .iter()
            .all(|t| type_line.contains(&t.to_lowercase()))
        {
            return false;
        }

        if let Some(format) = &self.format {
            if !card.is_legal_in(format) {
                return false;
            }
        }

        if self.min_cmc.is_some_and(|min| card.cmc < min) {
            return false;
        }
        if self.max_cmc.is_some_and(|max| card.cmc > max) {
            return false;
        }

        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_name = card.name.to_lowercase().contains(&needle);
            let in_oracle = card
                .oracle_text
                .as_deref()
                .is_some_and(|o| o.to_lowercase().contains(&needle));
            if !in_name && !in_oracle {
                return false;
            }
        }

        if let Some(rarity) = &self.rarity {
            match &card.rarity {
                Some(r) if r.eq_ignore_ascii_case(rarity) => {}
                _ => return false,
            }
        }

        true
    }
}
