//! JSON import/export of flashcards.
//! Provides bundle files for sharing cards and a single-file storage backend.

use crate::error::StorageError;
use crate::models::Flashcard;
use crate::store::CardStorage;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// On-disk document: a versioned wrapper around the card list.
#[derive(Serialize, Deserialize)]
struct CardBundle {
    version: u32,
    cards: Vec<Flashcard>,
}

const BUNDLE_VERSION: u32 = 1;

/// Writes `contents` next to `path` and renames it into place, so readers
/// see either the old file or the new one, never a partial write.
fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let tmp_path = dir.join(format!(".cards-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn to_json(cards: &[Flashcard]) -> Result<String, StorageError> {
    let bundle = CardBundle {
        version: BUNDLE_VERSION,
        cards: cards.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Exports cards to a JSON file at the specified path.
pub fn export_json_to_path(cards: &[Flashcard], path: impl AsRef<Path>) -> Result<(), StorageError> {
    write_atomic(path.as_ref(), &to_json(cards)?)?;
    info!("Exported {} cards to '{}'", cards.len(), path.as_ref().display());
    Ok(())
}

/// Imports cards from a JSON file.
/// Accepts either a bundle document or a bare array of cards.
pub fn import_json(path: impl AsRef<Path>) -> Result<Vec<Flashcard>, StorageError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let cards = parse_cards(&contents)?;
    info!("Read {} cards from '{}'", cards.len(), path.as_ref().display());
    Ok(cards)
}

fn parse_cards(contents: &str) -> Result<Vec<Flashcard>, StorageError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Document {
        Bundle(CardBundle),
        Bare(Vec<Flashcard>),
    }

    match serde_json::from_str::<Document>(contents)? {
        Document::Bundle(bundle) if bundle.version > BUNDLE_VERSION => Err(StorageError::Corrupt(
            format!("unsupported bundle version {}", bundle.version),
        )),
        Document::Bundle(bundle) => Ok(bundle.cards),
        Document::Bare(cards) => Ok(cards),
    }
}

/// Card storage in a single JSON file, replaced atomically on every save.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CardStorage for JsonFileStorage {
    fn load(&mut self) -> Result<Vec<Flashcard>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        parse_cards(&fs::read_to_string(&self.path)?)
    }

    fn save(&mut self, cards: &[Flashcard]) -> Result<(), StorageError> {
        write_atomic(&self.path, &to_json(cards)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCard, Rating};
    use crate::store::CardStore;
    use chrono::Utc;

    fn create_test_cards() -> Vec<Flashcard> {
        let mut first = Flashcard::new(
            NewCard::new("What is a closure?", "A function with access to outer scope", "javascript", "medium")
                .with_tags(["scope"])
                .validate()
                .unwrap(),
            Utc::now(),
        );
        first.record_rating(Rating::Easy, Utc::now());
        let second = Flashcard::new(
            NewCard::new("What is a virtual DOM?", "An in-memory tree diffed before rendering", "react", "easy")
                .validate()
                .unwrap(),
            Utc::now(),
        );
        vec![first, second]
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let cards = create_test_cards();

        export_json_to_path(&cards, &path).unwrap();
        assert!(path.exists(), "File should exist");

        let imported = import_json(&path).unwrap();
        assert_eq!(imported, cards);
    }

    #[test]
    fn test_export_uses_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        export_json_to_path(&create_test_cards(), &path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"reviewCount\": 1"));
        assert!(raw.contains("\"lastReviewedAt\""));
        assert!(raw.contains("\"category\": \"javascript\""));
    }

    #[test]
    fn test_import_bare_array() {
        let json_content = r#"[
  {
    "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
    "front": "What is a hash map?",
    "back": "Key-value store with O(1) average lookup",
    "category": "algorithms",
    "difficulty": "easy",
    "createdAt": "2024-01-01T10:00:00Z",
    "updatedAt": "2024-01-01T10:00:00Z"
  }
]"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, json_content).unwrap();

        let cards = import_json(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "What is a hash map?");
        assert_eq!(cards[0].confidence, 0);
        assert!(cards[0].tags.is_empty());
        assert!(cards[0].last_reviewed_at.is_none());
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_json(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_import_rejects_future_bundle_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{ "version": 99, "cards": [] }"#).unwrap();

        assert!(matches!(import_json(&path), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("cards.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_backs_card_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cards.json");

        let mut store = CardStore::open(JsonFileStorage::new(&path)).unwrap();
        let card = store
            .create(NewCard::new("What is CAP?", "Consistency, availability, partition tolerance", "system-design", "hard"))
            .unwrap();
        let rated = store.apply_rating(card.id, Rating::Medium).unwrap();

        let reopened = CardStore::open(JsonFileStorage::new(&path)).unwrap();
        assert_eq!(reopened.all(), &[rated]);

        // no temp files left behind
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
