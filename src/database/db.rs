//! SQLite persistence for the card store
//!
//! Every save replaces the whole `cards` table inside a single transaction, so a
//! failure part-way leaves the previously saved collection in place.

use crate::error::StorageError;
use crate::models::{CardId, Category, Difficulty, Flashcard};
use crate::store::CardStorage;
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, Row, params};
use std::path::Path;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        info!("Opened card database at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Creates the cards table if it does not exist yet
fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    // position keeps insertion order across saves
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            category TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            confidence INTEGER NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            correct_count INTEGER NOT NULL DEFAULT 0,
            last_reviewed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("bad timestamp '{}': {}", value, e)))
}

/// Narrows an INTEGER column to the card field type. Out-of-range values are corruption.
fn narrow<T: TryFrom<i64>>(column: &str, value: i64) -> Result<T, StorageError> {
    T::try_from(value)
        .map_err(|_| StorageError::Corrupt(format!("{} out of range: {}", column, value)))
}

/// Raw column values, converted to a `Flashcard` outside the rusqlite row callback
struct CardRow {
    id: String,
    front: String,
    back: String,
    category: String,
    difficulty: String,
    tags: String,
    confidence: i64,
    review_count: i64,
    correct_count: i64,
    last_reviewed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
            tags: row.get(5)?,
            confidence: row.get(6)?,
            review_count: row.get(7)?,
            correct_count: row.get(8)?,
            last_reviewed_at: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_card(self) -> Result<Flashcard, StorageError> {
        let id = self
            .id
            .parse::<CardId>()
            .map_err(|e| StorageError::Corrupt(format!("bad card id '{}': {}", self.id, e)))?;
        let category = self
            .category
            .parse::<Category>()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let last_reviewed_at = match self.last_reviewed_at.as_deref() {
            Some(value) => Some(parse_timestamp(value)?),
            None => None,
        };

        Ok(Flashcard {
            id,
            front: self.front,
            back: self.back,
            category,
            difficulty,
            tags: serde_json::from_str(&self.tags)?,
            confidence: narrow("confidence", self.confidence)?,
            review_count: narrow("review_count", self.review_count)?,
            correct_count: narrow("correct_count", self.correct_count)?,
            last_reviewed_at,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl CardStorage for SqliteStorage {
    fn load(&mut self) -> Result<Vec<Flashcard>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, front, back, category, difficulty, tags, confidence, review_count,
                    correct_count, last_reviewed_at, created_at, updated_at
             FROM cards
             ORDER BY position ASC",
        )?;

        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<CardRow>>>()?;

        rows.into_iter().map(CardRow::into_card).collect()
    }

    fn save(&mut self, cards: &[Flashcard]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM cards", ())?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cards (id, position, front, back, category, difficulty, tags,
                                    confidence, review_count, correct_count, last_reviewed_at,
                                    created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for (position, card) in cards.iter().enumerate() {
                stmt.execute(params![
                    card.id.to_string(),
                    position as i64,
                    card.front,
                    card.back,
                    card.category.as_str(),
                    card.difficulty.as_str(),
                    serde_json::to_string(&card.tags)?,
                    card.confidence,
                    card.review_count,
                    card.correct_count,
                    card.last_reviewed_at.map(|t| t.to_rfc3339()),
                    card.created_at.to_rfc3339(),
                    card.updated_at.to_rfc3339(),
                ])?;
            }
        }
        // dropping an uncommitted transaction rolls it back
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCard, Rating};
    use crate::store::CardStore;

    fn sample() -> NewCard {
        NewCard::new(
            "What is normalization?",
            "Structuring tables to reduce redundancy",
            "database",
            "medium",
        )
        .with_tags(["sql", "design"])
    }

    #[test]
    fn test_fresh_database_loads_empty() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_preserves_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.sqlite3");

        let mut store = CardStore::open(SqliteStorage::open(&path).unwrap()).unwrap();
        let first = store.create(sample()).unwrap();
        let second = store
            .create(NewCard::new("What is a B-tree?", "A balanced search tree", "database", "hard"))
            .unwrap();
        let rated = store.apply_rating(first.id, Rating::Easy).unwrap();
        drop(store);

        let mut storage = SqliteStorage::open(&path).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded, vec![rated, second]);
    }

    #[test]
    fn test_save_replaces_collection() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let content = sample().validate().unwrap();
        let a = Flashcard::new(content.clone(), Utc::now());
        let b = Flashcard::new(content, Utc::now());

        storage.save(&[a.clone(), b.clone()]).unwrap();
        storage.save(&[b.clone()]).unwrap();

        assert_eq!(storage.load().unwrap(), vec![b]);
    }

    #[test]
    fn test_failed_save_keeps_previous_rows() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let card = Flashcard::new(sample().validate().unwrap(), Utc::now());
        storage.save(&[card.clone()]).unwrap();

        // duplicate primary key aborts the second insert
        let result = storage.save(&[card.clone(), card.clone()]);
        assert!(matches!(result, Err(StorageError::Sqlite(_))));
        assert_eq!(storage.load().unwrap(), vec![card]);
    }

    #[test]
    fn test_unknown_category_is_corrupt() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        let card = Flashcard::new(sample().validate().unwrap(), Utc::now());
        storage.save(&[card]).unwrap();
        storage
            .conn
            .execute("UPDATE cards SET category = 'cooking'", ())
            .unwrap();

        assert!(matches!(storage.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_out_of_range_counters_are_corrupt() {
        for update in [
            "UPDATE cards SET confidence = 300",
            "UPDATE cards SET review_count = -1",
            "UPDATE cards SET correct_count = 5000000000",
        ] {
            let mut storage = SqliteStorage::open_in_memory().unwrap();
            let card = Flashcard::new(sample().validate().unwrap(), Utc::now());
            storage.save(&[card]).unwrap();
            storage.conn.execute(update, ()).unwrap();

            assert!(
                matches!(storage.load(), Err(StorageError::Corrupt(_))),
                "{update}"
            );
        }
    }
}
