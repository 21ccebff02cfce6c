pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod seed;
pub mod session;
pub mod stats;
pub mod store;

pub use error::{SessionError, StaleCard, StorageError, StoreError, ValidationError};
pub use filter::CardFilter;
pub use models::{CardId, Category, Difficulty, Flashcard, NewCard, Rating};
pub use session::{RateOutcome, Session, SessionRunner, SessionState, SessionSummary};
pub use stats::Stats;
pub use store::{CardStorage, CardStore, MemoryStorage};
