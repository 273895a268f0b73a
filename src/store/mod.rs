//! Key-value store trait and implementations.
//!
//! This module provides the backing stores for persistent settings:
//! - `FileStore` - TOML file on disk (default)
//! - `MemoryStore` - In-process map, for ephemeral settings and tests
//!
//! Stores are opened through a [`StoreProvider`] so that handlers never
//! construct a store themselves and tests can pass a double explicitly.

mod file;
mod memory;

pub use file::{FileStore, FileStoreProvider};
pub use memory::{MemoryStore, MemoryStoreProvider};

use crate::Result;
use std::path::Path;

/// Trait for stores that hold string values by string key.
///
/// Implementations must not leave partially applied writes behind: a failed
/// `set` leaves the store exactly as it was.
pub trait KeyValueStore: Send {
    /// Read the stored value for a key, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value for a key.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Flush any buffered writes to the backing medium.
    fn sync(&mut self) -> Result<()>;

    /// Get the location this store is bound to.
    fn path(&self) -> &Path;
}

/// Opens key-value stores by path.
pub trait StoreProvider: Send + Sync {
    /// Open (or create on first write) the store at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn KeyValueStore>>;
}

/// Split a dotted key into its namespace and the remainder.
///
/// Keys without a dot have no namespace.
pub(crate) fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once('.') {
        Some((namespace, rest)) if !namespace.is_empty() && !rest.is_empty() => {
            (Some(namespace), rest)
        }
        _ => (None, key),
    }
}
