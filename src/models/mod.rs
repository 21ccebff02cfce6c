pub mod classification;
pub mod flashcard;
pub mod rating;

pub use classification::{Category, Difficulty};
pub use flashcard::{CardContent, CardId, Flashcard, MAX_CONFIDENCE, MIN_TEXT_LEN, NewCard};
pub use rating::Rating;
