//! # Import Command
//!
//! Load a JSON card list into the SQLite card database.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::Session;

#[derive(Debug, Serialize)]
struct ImportReport {
    imported: usize,
    total: usize,
}

pub async fn run(session: &Session, file: &Path) -> Result<()> {
    let cards = deck_store::load_cards_json(file)
        .with_context(|| format!("Failed to load cards from '{}'", file.display()))?;

    let imported = session
        .store
        .import(cards)
        .await
        .context("Failed to write cards to the card database")?;
    let total = session.store.count().await?;
    info!(imported, total, "Card import finished");

    let report = ImportReport { imported, total };
    session.emit(&report, || {
        println!("Imported {} card(s), {} in database", report.imported, report.total);
    })
}
