//! CLI command implementations

pub mod batch;
pub mod cache;
pub mod card;
pub mod import;

use anyhow::{Context, Result};
use deck_core::cache::TieredCache;
use deck_core::{CardRecord, Config, LookupRepository};
use deck_store::SqliteCardStore;
use serde::Serialize;
use std::sync::Arc;

use crate::Commands;

/// One cache + repository over the configured card database.
///
/// The cache lives as long as the process; `batch` reuses it across lines.
pub struct Session {
    pub config: Config,
    pub cache: Arc<TieredCache<CardRecord>>,
    pub store: Arc<SqliteCardStore>,
    pub repo: LookupRepository,
    pub json: bool,
}

impl Session {
    pub fn open(config: Config, json: bool) -> Result<Self> {
        let db_path = &config.store.database_path;
        let store = Arc::new(
            SqliteCardStore::open(db_path)
                .with_context(|| format!("Failed to open card database '{}'", db_path.display()))?,
        );
        let cache = Arc::new(TieredCache::new(config.cache.clone()));
        let repo = LookupRepository::with_config(cache.clone(), store.clone(), config.repository.clone());

        Ok(Self {
            config,
            cache,
            store,
            repo,
            json,
        })
    }

    /// Print `value` as pretty JSON in `--json` mode, otherwise run `human`.
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

pub async fn dispatch(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Import { file } => import::run(session, &file).await,
        Commands::Lookup { names } => card::lookup(session, &names).await,
        Commands::Search(args) => card::search(session, args).await,
        Commands::Fuzzy { name, limit } => card::fuzzy(session, &name, limit).await,
        Commands::Preload { names, file } => card::preload(session, names, file.as_deref()).await,
        Commands::Stats => cache::stats(session).await,
        Commands::Clear { tier } => cache::clear(session, tier),
        Commands::Batch => anyhow::bail!("batch cannot be nested"),
    }
}

/// Single-line human rendering of a card
pub fn format_card(card: &CardRecord) -> String {
    let mut line = card.name.clone();
    if let Some(cost) = &card.mana_cost {
        line.push_str(&format!("  {}", cost));
    }
    line.push_str(&format!("  [{}]", card.type_line));
    if !card.colors.is_empty() {
        line.push_str(&format!("  ({})", card.color_codes()));
    }
    line
}
