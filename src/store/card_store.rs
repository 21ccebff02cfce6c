//! Authoritative in-memory collection of flashcards, written through to a
//! [`CardStorage`] backend after every mutation.
//!
//! Mutations build the next collection, save it, and only then replace the
//! in-memory state, so a failed save leaves the store exactly as it was.

use super::storage::CardStorage;
use crate::error::{StorageError, StoreError};
use crate::models::{CardId, Flashcard, NewCard, Rating};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashSet;

pub struct CardStore {
    cards: Vec<Flashcard>,
    storage: Box<dyn CardStorage + Send>,
}

impl CardStore {
    /// Loads the store from `storage`. Absence of prior data yields an empty store.
    pub fn open(storage: impl CardStorage + Send + 'static) -> Result<Self, StoreError> {
        let mut storage: Box<dyn CardStorage + Send> = Box::new(storage);
        let cards = storage.load()?;

        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id) {
                warn!("Rejecting stored cards: duplicate id {}", card.id);
                return Err(StorageError::Corrupt(format!("duplicate card id {}", card.id)).into());
            }
            if let Err(reason) = card.check_integrity() {
                warn!("Rejecting stored cards: {}", reason);
                return Err(StorageError::Corrupt(reason).into());
            }
        }

        info!("Loaded {} flashcards", cards.len());
        Ok(Self { cards, storage })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All cards in insertion order.
    pub fn all(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn get(&self, id: CardId) -> Result<&Flashcard, StoreError> {
        self.find(id).ok_or(StoreError::NotFound(id))
    }

    pub fn find(&self, id: CardId) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn position(&self, id: CardId) -> Result<usize, StoreError> {
        self.cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn commit(&mut self, next: Vec<Flashcard>) -> Result<(), StoreError> {
        self.storage.save(&next)?;
        self.cards = next;
        Ok(())
    }

    /// Creates a new, unseen card from form input.
    pub fn create(&mut self, input: NewCard) -> Result<Flashcard, StoreError> {
        let content = input.validate()?;
        let card = Flashcard::new(content, Utc::now());

        let mut next = self.cards.clone();
        next.push(card.clone());
        self.commit(next)?;

        debug!("Created card {} ({})", card.id, card.category);
        Ok(card)
    }

    /// Records one rating step. This is the only path that changes
    /// confidence and the review counters.
    pub fn apply_rating(&mut self, id: CardId, rating: Rating) -> Result<Flashcard, StoreError> {
        let pos = self.position(id)?;

        let mut next = self.cards.clone();
        next[pos].record_rating(rating, Utc::now());
        let updated = next[pos].clone();
        self.commit(next)?;

        debug!(
            "Rated card {} as {} (reviews: {}, correct: {})",
            id,
            rating.value(),
            updated.review_count,
            updated.correct_count
        );
        Ok(updated)
    }

    /// Direct edit of author content. Review state is untouched.
    pub fn edit(&mut self, id: CardId, input: NewCard) -> Result<Flashcard, StoreError> {
        let pos = self.position(id)?;
        let content = input.validate()?;

        let mut next = self.cards.clone();
        next[pos].replace_content(content, Utc::now());
        let updated = next[pos].clone();
        self.commit(next)?;

        debug!("Edited card {}", id);
        Ok(updated)
    }

    pub fn delete(&mut self, id: CardId) -> Result<Flashcard, StoreError> {
        let pos = self.position(id)?;

        let mut next = self.cards.clone();
        let removed = next.remove(pos);
        self.commit(next)?;

        debug!("Deleted card {}", id);
        Ok(removed)
    }

    /// Bulk import of complete cards (sample deck, JSON bundle).
    ///
    /// Cards whose id is already present are skipped. The batch is rejected as a
    /// whole if any card breaks the card invariants. Returns the number added.
    pub fn import(&mut self, cards: Vec<Flashcard>) -> Result<usize, StoreError> {
        let mut seen: HashSet<CardId> = self.cards.iter().map(|c| c.id).collect();
        let mut next = self.cards.clone();
        let mut added = 0;

        for card in cards {
            card.check_integrity().map_err(StorageError::Corrupt)?;
            if seen.insert(card.id) {
                next.push(card);
                added += 1;
            }
        }

        if added > 0 {
            self.commit(next)?;
        }
        info!("Imported {} flashcards", added);
        Ok(added)
    }
}
