//! # Card Commands
//!
//! lookup / search / fuzzy / preload

use anyhow::{Context, Result};
use clap::Args;
use deck_core::{Color, SearchCriteria};
use std::path::Path;

use super::{format_card, Session};

/// Search filters. Repeated `--color` / `--type` must all match.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Required color (W, U, B, R, G or full name)
    #[arg(long = "color", short = 'c')]
    pub colors: Vec<Color>,

    /// Required type-line fragment, e.g. "Creature"
    #[arg(long = "type", short = 't')]
    pub types: Vec<String>,

    /// Format the card must be legal in
    #[arg(long)]
    pub format: Option<String>,

    #[arg(long)]
    pub min_cmc: Option<f64>,

    #[arg(long)]
    pub max_cmc: Option<f64>,

    /// Text appearing in the name or rules text
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub rarity: Option<String>,

    /// Maximum number of results
    #[arg(long, short)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    pub fn into_criteria(self) -> SearchCriteria {
        let mut criteria = SearchCriteria::new()
            .with_colors(self.colors)
            .with_cmc_range(self.min_cmc, self.max_cmc);
        for card_type in self.types {
            criteria = criteria.with_type(card_type);
        }
        if let Some(format) = self.format {
            criteria = criteria.with_format(format);
        }
        if let Some(text) = self.text {
            criteria = criteria.with_text(text);
        }
        if let Some(rarity) = self.rarity {
            criteria = criteria.with_rarity(rarity);
        }
        if let Some(limit) = self.limit {
            criteria = criteria.with_limit(limit);
        }
        criteria
    }
}

pub async fn lookup(session: &Session, names: &[String]) -> Result<()> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        let card = session
            .repo
            .get_by_name(name)
            .await
            .with_context(|| format!("Failed to look up '{}'", name))?;
        found.push((name, card));
    }

    let cards: Vec<_> = found.iter().map(|(_, card)| card.clone()).collect();
    session.emit(&cards, || {
        for (name, card) in &found {
            match card {
                Some(card) => {
                    println!("{}", format_card(card));
                    if let Some(text) = &card.oracle_text {
                        println!("    {}", text);
                    }
                }
                None => println!("No card found: {}", name),
            }
        }
    })
}

pub async fn search(session: &Session, args: SearchArgs) -> Result<()> {
    let criteria = args.into_criteria();
    let cards = session
        .repo
        .search(&criteria)
        .await
        .context("Card search failed")?;

    session.emit(&cards, || {
        for card in &cards {
            println!("{}", format_card(card));
        }
        println!("{} card(s)", cards.len());
    })
}

pub async fn fuzzy(session: &Session, name: &str, limit: usize) -> Result<()> {
    let cards = session
        .repo
        .fuzzy_search(name, limit)
        .await
        .with_context(|| format!("Fuzzy search for '{}' failed", name))?;

    session.emit(&cards, || {
        if cards.is_empty() {
            println!("No close matches for: {}", name);
        }
        for card in &cards {
            println!("{}", format_card(card));
        }
    })
}

pub async fn preload(session: &Session, mut names: Vec<String>, file: Option<&Path>) -> Result<()> {
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read name list '{}'", path.display()))?;
        names.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if names.is_empty() {
        anyhow::bail!("No card names given to preload");
    }

    let report = session
        .repo
        .preload_by_names(names.as_slice())
        .await
        .context("Cache preload failed")?;

    session.emit(&report, || {
        println!(
            "Preloaded {} card(s), {} already cached",
            report.loaded, report.already_cached
        );
        if !report.not_found.is_empty() {
            println!("Not found: {}", report.not_found.join(", "));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_into_criteria() {
        let args = SearchArgs {
            colors: vec![Color::Red],
            types: vec!["Instant".into()],
            format: Some("modern".into()),
            max_cmc: Some(2.0),
            limit: Some(5),
            ..Default::default()
        };
        let criteria = args.into_criteria();
        assert_eq!(criteria.colors, vec![Color::Red]);
        assert_eq!(criteria.types, vec!["Instant".to_string()]);
        assert_eq!(criteria.format.as_deref(), Some("modern"));
        assert_eq!(criteria.min_cmc, None);
        assert_eq!(criteria.max_cmc, Some(2.0));
        assert_eq!(criteria.limit, Some(5));
    }
}
