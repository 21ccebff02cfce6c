use crate::error::StorageError;
use crate::models::Flashcard;

/// Persistence contract of the card store.
///
/// The store always hands over the complete collection, in insertion order.
pub trait CardStorage {
    /// Load every stored card. A store that was never written loads as empty.
    fn load(&mut self) -> Result<Vec<Flashcard>, StorageError>;

    /// Replace the stored collection with `cards`.
    /// MUST be all-or-nothing: after a failure the previous collection is intact.
    fn save(&mut self, cards: &[Flashcard]) -> Result<(), StorageError>;
}
