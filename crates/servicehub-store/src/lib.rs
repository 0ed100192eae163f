// Key-value persistence for everything the app remembers between sessions
// Bookmarks, recent searches and the locale preference all live behind this seam

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{read_json, write_json, KeyValueStore};

#[cfg(any(test, feature = "mock"))]
pub use store::MockKeyValueStore;

/// Result type alias for storage round-trips
pub type Result<T> = std::result::Result<T, StoreError>;
