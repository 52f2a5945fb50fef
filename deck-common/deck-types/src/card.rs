use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mana color of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W", alias = "white")]
    White,
    #[serde(rename = "U", alias = "blue")]
    Blue,
    #[serde(rename = "B", alias = "black")]
    Black,
    #[serde(rename = "R", alias = "red")]
    Red,
    #[serde(rename = "G", alias = "green")]
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green];

    /// Single-letter code (`W`, `U`, `B`, `R`, `G`).
    pub fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color: {0}")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Color::from_code(c).ok_or_else(|| ParseColorError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "white" => Ok(Color::White),
            "blue" => Ok(Color::Blue),
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// A card as known to the card database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    /// Converted mana cost.
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    /// Formats in which the card is legal, lowercase.
    #[serde(default)]
    pub legal_formats: Vec<String>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>, type_line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mana_cost: None,
            cmc: 0.0,
            colors: Vec::new(),
            type_line: type_line.into(),
            oracle_text: None,
            rarity: None,
            legal_formats: Vec::new(),
        }
    }

    pub fn with_mana_cost(mut self, mana_cost: impl Into<String>, cmc: f64) -> Self {
        self.mana_cost = Some(mana_cost.into());
        self.cmc = cmc;
        self
    }

    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = colors.into_iter().collect();
        self.colors.sort();
        self.colors.dedup();
        self
    }

    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = Some(text.into());
        self
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into().to_lowercase());
        self
    }

    pub fn with_legal_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legal_formats = formats.into_iter().map(|f| f.into().to_lowercase()).collect();
        self
    }

    /// Color identity encoded as ordered letter codes, e.g. `"UR"`.
    pub fn color_codes(&self) -> String {
        let mut colors = self.colors.clone();
        colors.sort();
        colors.dedup();
        colors.into_iter().map(Color::code).collect()
    }

    pub fn is_legal_in(&self, format: &str) -> bool {
        self.legal_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("U".parse::<Color>().unwrap(), Color::Blue);
        assert_eq!("g".parse::<Color>().unwrap(), Color::Green);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert!("purple".parse::<Color>().is_err());
        assert!("X".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_codes_are_ordered() {
        let card = CardRecord::new("Izzet Charm", "Instant")
            .with_colors([Color::Red, Color::Blue, Color::Red]);
        assert_eq!(card.color_codes(), "UR");
    }

    #[test]
    fn test_card_deserializes_with_defaults() {
        let json = r#"{"name": "Lightning Bolt", "colors": ["R"], "cmc": 1.0}"#;
        let card: CardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.colors, vec![Color::Red]);
        assert!(card.legal_formats.is_empty());
        assert!(card.oracle_text.is_none());
    }

    #[test]
    fn test_is_legal_in_ignores_case() {
        let card = CardRecord::new("Counterspell", "Instant").with_legal_formats(["Modern", "legacy"]);
        assert!(card.is_legal_in("modern"));
        assert!(card.is_legal_in("LEGACY"));
        assert!(!card.is_legal_in("standard"));
    }
}
