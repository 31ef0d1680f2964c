//! Persistent byte store for remotely loaded images
//!
//! Maps the image cache's abstract operations (load, save, expire) onto a
//! key -> (bytes, timestamp) record store. Ships a SQLite-backed
//! implementation and an in-memory one with the same contract.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod storage;
pub mod types;

pub use error::{Result, StorageError};
pub use memory::MemoryImageCacheStorage;
pub use sqlite::SqliteImageCacheStorage;
pub use storage::ImageCacheStorage;
pub use types::CacheEntry;
