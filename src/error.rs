//! Error types shared by the card store, the persistence backends and study sessions.

use crate::models::CardId;
use thiserror::Error;

/// Malformed user input rejected before any state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("rating must be between 1 and 4, got {0}")]
    InvalidRating(u8),
}

/// Failures of the persistence layer (load/save).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt card data: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("card not found: {0}")]
    NotFound(CardId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot study an empty set of cards")]
    EmptySet,

    #[error("session is already completed")]
    SessionClosed,

    #[error("card must be revealed before it can be rated")]
    NotRevealed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A card referenced by a live session was deleted from the store.
/// The session runner recovers from this by skipping the card.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("card {id} was deleted during the session")]
pub struct StaleCard {
    pub id: CardId,
}
