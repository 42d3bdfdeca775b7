//! Local key-value caching.
//!
//! # Data Flow
//! ```text
//! KeyValueStore (memory.rs / file.rs, string keys and values)
//!     → content.rs   cache/<digest>         hex bytes, valid forever
//!     → execution.rs announcement/<txHash>  JSON metadata, refreshed until settled
//! ```
//!
//! # Design Decisions
//! - Two caches with separate namespaces and separate invalidation contracts
//! - Writes are last-writer-wins per key
//! - Persistence is explicit (`FileStore::save_to_file`), never on every write

pub mod content;
pub mod execution;
pub mod file;
pub mod memory;

use thiserror::Error;

pub use content::ContentCache;
pub use execution::ExecutionCache;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Process-wide string key-value store backing both caches.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors from loading or saving a persistent cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
