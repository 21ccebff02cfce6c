use super::storage::CardStorage;
use crate::error::StorageError;
use crate::models::Flashcard;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    cards: Vec<Flashcard>,
    saves: usize,
    fail_writes: bool,
}

/// In-memory storage backend, mostly for tests.
///
/// Clones share the same underlying collection, so a test can keep a handle
/// to inspect what the store saved after moving the backend into it.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Flashcard>) -> Self {
        let storage = Self::default();
        storage.lock().cards = cards;
        storage
    }

    /// Make every following `save` fail, to exercise error handling.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// The collection as last saved.
    pub fn snapshot(&self) -> Vec<Flashcard> {
        self.lock().cards.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // a poisoned lock still holds consistent data: save replaces it wholesale
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CardStorage for MemoryStorage {
    fn load(&mut self) -> Result<Vec<Flashcard>, StorageError> {
        Ok(self.lock().cards.clone())
    }

    fn save(&mut self, cards: &[Flashcard]) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated write error",
            )));
        }
        inner.cards = cards.to_vec();
        inner.saves += 1;
        Ok(())
    }
}
