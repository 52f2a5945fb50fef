//! SQLite card database.
//!
//! Cards live in `cards`, format legality in `card_formats`. Search criteria
//! are translated into a single parameterized `SELECT`.
//!
//! Both tables are keyed by `name_key`, the Unicode lowercase of the card
//! name, matching the repository's cache keys. SQLite's `NOCASE` only folds
//! ASCII, so it is not used for name identity.

use async_trait::async_trait;
use deck_traits::{CardStore, StoreError};
use deck_types::{CardRecord, Color, SearchCriteria};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::fuzzy;

const CARD_COLUMNS: &str = "c.name, c.mana_cost, c.cmc, c.colors, c.type_line, c.oracle_text, c.rarity,
     (SELECT GROUP_CONCAT(f.format, ',') FROM card_formats f WHERE f.card_key = c.name_key) AS formats";

/// Identity key for a card name
fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Card store backed by a SQLite file.
pub struct SqliteCardStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCardStore {
    /// Open (or create) the card database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::database(format!("Failed to open card db: {}", e)))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = memory;",
        )
        .map_err(|e| StoreError::database(format!("Failed to configure WAL: {}", e)))?;

        let store = Self::from_connection(conn)?;
        info!("Opened card database at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::database(format!("Failed to open in-memory db: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::unavailable("card db connection lock poisoned"))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::unavailable(format!("card db task failed: {}", e)))?
    }

    /// Insert or replace cards. Returns the number written.
    pub async fn import(&self, cards: Vec<CardRecord>) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| StoreError::database(format!("Failed to begin import: {}", e)))?;

            for card in &cards {
                upsert_card(&tx, card)?;
            }

            tx.commit()
                .map_err(|e| StoreError::database(format!("Failed to commit import: {}", e)))?;
            debug!("Imported {} cards", cards.len());
            Ok(cards.len())
        })
        .await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get::<_, i64>(0))
                .map(|n| n as usize)
                .map_err(|e| StoreError::database(format!("Failed to count cards: {}", e)))
        })
        .await
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cards (
            name_key TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            mana_cost TEXT,
            cmc REAL NOT NULL DEFAULT 0,
            colors TEXT NOT NULL DEFAULT '',
            type_line TEXT NOT NULL DEFAULT '',
            oracle_text TEXT,
            rarity TEXT
        );
        CREATE TABLE IF NOT EXISTS card_formats (
            card_key TEXT NOT NULL,
            format TEXT NOT NULL,
            PRIMARY KEY (card_key, format)
        );
        CREATE INDEX IF NOT EXISTS idx_cards_cmc ON cards(cmc);
        CREATE INDEX IF NOT EXISTS idx_card_formats_format ON card_formats(format);",
    )
    .map_err(|e| StoreError::database(format!("Failed to create card schema: {}", e)))
}

fn upsert_card(conn: &Connection, card: &CardRecord) -> Result<(), StoreError> {
    let key = name_key(&card.name);
    conn.execute(
        "INSERT INTO cards (name_key, name, mana_cost, cmc, colors, type_line, oracle_text, rarity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(name_key) DO UPDATE SET
         name = excluded.name,
         mana_cost = excluded.mana_cost,
         cmc = excluded.cmc,
         colors = excluded.colors,
         type_line = excluded.type_line,
         oracle_text = excluded.oracle_text,
         rarity = excluded.rarity",
        rusqlite::params![
            key,
            card.name,
            card.mana_cost,
            card.cmc,
            card.color_codes(),
            card.type_line,
            card.oracle_text,
            card.rarity.as_ref().map(|r| r.to_lowercase()),
        ],
    )
    .map_err(|e| StoreError::database(format!("Failed to upsert card '{}': {}", card.name, e)))?;

    conn.execute("DELETE FROM card_formats WHERE card_key = ?1", [&key])
        .map_err(|e| StoreError::database(format!("Failed to reset formats: {}", e)))?;
    for format in &card.legal_formats {
        conn.execute(
            "INSERT OR IGNORE INTO card_formats (card_key, format) VALUES (?1, ?2)",
            [&key, &format.to_lowercase()],
        )
        .map_err(|e| StoreError::database(format!("Failed to insert format: {}", e)))?;
    }
    Ok(())
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    let colors: String = row.get(3)?;
    let formats: Option<String> = row.get(7)?;
    Ok(CardRecord {
        name: row.get(0)?,
        mana_cost: row.get(1)?,
        cmc: row.get(2)?,
        colors: colors.chars().filter_map(Color::from_code).collect(),
        type_line: row.get(4)?,
        oracle_text: row.get(5)?,
        rarity: row.get(6)?,
        legal_formats: formats
            .map(|f| f.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
    })
}

/// Escape `%`, `_` and `\` and wrap in wildcards.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Translate criteria into a `WHERE` clause and its parameters.
fn build_search_query(criteria: &SearchCriteria) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for color in &criteria.colors {
        clauses.push("c.colors LIKE ?".to_string());
        params.push(Value::Text(format!("%{}%", color.code())));
    }
    for card_type in &criteria.types {
        clauses.push("c.type_line LIKE ? ESCAPE '\\'".to_string());
        params.push(Value::Text(like_pattern(card_type)));
    }
    if let Some(format) = &criteria.format {
        clauses.push(
            "EXISTS (SELECT 1 FROM card_formats f WHERE f.card_key = c.name_key AND f.format = ?)"
                .to_string(),
        );
        params.push(Value::Text(format.to_lowercase()));
    }
    if let Some(min) = criteria.min_cmc {
        clauses.push("c.cmc >= ?".to_string());
        params.push(Value::Real(min));
    }
    if let Some(max) = criteria.max_cmc {
        clauses.push("c.cmc <= ?".to_string());
        params.push(Value::Real(max));
    }
    if let Some(text) = &criteria.text {
        clauses.push("(c.name LIKE ? ESCAPE '\\' OR c.oracle_text LIKE ? ESCAPE '\\')".to_string());
        let pattern = like_pattern(text);
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }
    if let Some(rarity) = &criteria.rarity {
        clauses.push("c.rarity = ? COLLATE NOCASE".to_string());
        params.push(Value::Text(rarity.clone()));
    }

    let mut sql = format!("SELECT {} FROM cards c", CARD_COLUMNS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY c.name COLLATE NOCASE");
    if let Some(limit) = criteria.limit {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(limit as i64));
    }

    (sql, params)
}

fn query_cards(conn: &Connection, sql: &str, params: Vec<Value>) -> Result<Vec<CardRecord>, StoreError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| StoreError::database(format!("Failed to prepare card query: {}", e)))?;
    let rows = stmt
        .query_map(params_from_iter(params), row_to_card)
        .map_err(|e| StoreError::database(format!("Failed to query cards: {}", e)))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| StoreError::database(format!("Failed to read card row: {}", e)))
}

#[async_trait]
impl CardStore for SqliteCardStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<CardRecord>, StoreError> {
        let key = name_key(name);
        self.with_conn(move |conn| {
            let sql = format!("SELECT {} FROM cards c WHERE c.name_key = ?1", CARD_COLUMNS);
            let mut cards = query_cards(conn, &sql, vec![Value::Text(key)])?;
            Ok(cards.pop())
        })
        .await
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CardRecord>, StoreError> {
        let (sql, params) = build_search_query(criteria);
        self.with_conn(move |conn| query_cards(conn, &sql, params)).await
    }

    async fn fuzzy_search(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>, StoreError> {
        let query = name.trim().to_string();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        self.with_conn(move |conn| {
            // Substring hits always outrank edit-distance hits, so the full
            // table is only scanned when they cannot fill the limit.
            let sql = format!(
                "SELECT {} FROM cards c WHERE c.name LIKE ? ESCAPE '\\'",
                CARD_COLUMNS
            );
            let substring = query_cards(conn, &sql, vec![Value::Text(like_pattern(&query))])?;
            if substring.len() >= limit {
                return Ok(fuzzy::rank_candidates(&query, substring, limit));
            }

            let sql = format!("SELECT {} FROM cards c", CARD_COLUMNS);
            let all = query_cards(conn, &sql, Vec::new())?;
            Ok(fuzzy::rank_candidates(&query, all, limit))
        })
        .await
    }

    async fn health_check(&self) -> bool {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|e| StoreError::database(e.to_string()))
        })
        .await
        .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_cards() -> Vec<CardRecord> {
        vec![
            CardRecord::new("Lightning Bolt", "Instant")
                .with_mana_cost("{R}", 1.0)
                .with_colors([Color::Red])
                .with_oracle_text("Lightning Bolt deals 3 damage to any target.")
                .with_rarity("common")
                .with_legal_formats(["modern", "legacy"]),
            CardRecord::new("Counterspell", "Instant")
                .with_mana_cost("{U}{U}", 2.0)
                .with_colors([Color::Blue])
                .with_oracle_text("Counter target spell.")
                .with_rarity("uncommon")
                .with_legal_formats(["legacy", "pauper"]),
            CardRecord::new("Izzet Charm", "Instant")
                .with_mana_cost("{U}{R}", 2.0)
                .with_colors([Color::Blue, Color::Red])
                .with_oracle_text("Choose one — Counter target noncreature spell unless its controller pays {2}.")
                .with_rarity("uncommon")
                .with_legal_formats(["modern"]),
            CardRecord::new("Grizzly Bears", "Creature — Bear")
                .with_mana_cost("{1}{G}", 2.0)
                .with_colors([Color::Green])
                .with_rarity("common")
                .with_legal_formats(["legacy"]),
        ]
    }

    async fn seeded_store() -> SqliteCardStore {
        let store = SqliteCardStore::open_in_memory().unwrap();
        store.import(sample_cards()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_import_and_count() {
        let store = seeded_store().await;
        assert_eq!(store.count().await.unwrap(), 4);

        // Re-import replaces rather than duplicates
        store.import(sample_cards()).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_get_by_name_round_trips_record() {
        let store = seeded_store().await;
        let card = store.get_by_name("lightning bolt").await.unwrap().unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.colors, vec![Color::Red]);
        assert_eq!(card.cmc, 1.0);
        let mut formats = card.legal_formats.clone();
        formats.sort();
        assert_eq!(formats, vec!["legacy", "modern"]);

        assert!(store.get_by_name("Black Lotus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_folds_non_ascii_case() {
        let store = seeded_store().await;
        store
            .import(vec![CardRecord::new("Æther Vial", "Artifact").with_legal_formats(["modern"])])
            .await
            .unwrap();

        let card = store.get_by_name("æTHER VIAL").await.unwrap().unwrap();
        assert_eq!(card.name, "Æther Vial");
        assert_eq!(card.legal_formats, vec!["modern"]);

        // 仅非 ASCII 大小写不同的名称视为同一张卡
        store
            .import(vec![CardRecord::new("ÆTHER VIAL", "Artifact")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 5);
        let card = store.get_by_name("æther vial").await.unwrap().unwrap();
        assert_eq!(card.name, "ÆTHER VIAL");
        assert!(card.legal_formats.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_in_memory_semantics() {
        let store = seeded_store().await;
        let criteria = SearchCriteria::new()
            .with_colors([Color::Red])
            .with_type("instant")
            .with_format("modern");
        let names: Vec<String> = store
            .search(&criteria)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Izzet Charm", "Lightning Bolt"]);

        let expected: Vec<String> = sample_cards()
            .into_iter()
            .filter(|c| criteria.matches(c))
            .map(|c| c.name)
            .collect();
        let mut expected = expected;
        expected.sort();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_search_text_cmc_rarity_and_limit() {
        let store = seeded_store().await;

        let counters = store
            .search(&SearchCriteria::new().with_text("counter"))
            .await
            .unwrap();
        assert_eq!(counters.len(), 2);

        let cheap = store
            .search(&SearchCriteria::new().with_cmc_range(None, Some(1.0)))
            .await
            .unwrap();
        assert_eq!(cheap.len(), 1);

        let uncommon = store
            .search(&SearchCriteria::new().with_rarity("Uncommon").with_limit(1))
            .await
            .unwrap();
        assert_eq!(uncommon.len(), 1);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let store = seeded_store().await;
        let results = store
            .search(&SearchCriteria::new().with_text("%"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fuzzy_search() {
        let store = seeded_store().await;
        let results = store.fuzzy_search("grizly bear", 3).await.unwrap();
        assert_eq!(results[0].name, "Grizzly Bears");

        let results = store.fuzzy_search("bolt", 3).await.unwrap();
        assert_eq!(results[0].name, "Lightning Bolt");

        assert!(store.fuzzy_search("", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("cards.db");
        {
            let store = SqliteCardStore::open(&path).unwrap();
            store.import(sample_cards()).await.unwrap();
        }
        let reopened = SqliteCardStore::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 4);
        assert!(reopened.health_check().await);
    }
}
