pub mod card_store;
pub mod memory;
pub mod storage;

pub use card_store::CardStore;
pub use memory::MemoryStorage;
pub use storage::CardStorage;
