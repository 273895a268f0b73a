//! In-memory key-value store.

use super::{KeyValueStore, StoreProvider};
use crate::Result;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Contents = Arc<Mutex<BTreeMap<String, String>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A store whose contents live only in the current process.
///
/// Stores opened from the same [`MemoryStoreProvider`] for the same path
/// share their contents.
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    contents: Contents,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create a standalone, empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::default(),
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.contents).get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", self.path.display()),
            )
            .into());
        }
        lock(&self.contents).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Opens [`MemoryStore`]s and remembers every path it was asked to open.
#[derive(Debug, Default)]
pub struct MemoryStoreProvider {
    stores: Mutex<HashMap<PathBuf, Contents>>,
    opened: Mutex<Vec<PathBuf>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStoreProvider {
    /// Create a provider with no stores.
    pub fn new() -> Self {
        Self::default()
    }

    fn contents_for(&self, path: &Path) -> Contents {
        lock(&self.stores)
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }

    /// Put a value into the store at `path` without going through a handler.
    pub fn seed(&self, path: impl AsRef<Path>, key: &str, value: &str) {
        lock(&self.contents_for(path.as_ref())).insert(key.to_string(), value.to_string());
    }

    /// Read a raw stored value without going through a handler.
    pub fn stored(&self, path: impl AsRef<Path>, key: &str) -> Option<String> {
        lock(&self.contents_for(path.as_ref())).get(key).cloned()
    }

    /// Every path passed to [`StoreProvider::open`], in call order.
    pub fn opened_paths(&self) -> Vec<PathBuf> {
        lock(&self.opened).clone()
    }

    /// Make every store from this provider reject writes.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn KeyValueStore>> {
        lock(&self.opened).push(path.to_path_buf());
        Ok(Box::new(MemoryStore {
            path: path.to_path_buf(),
            contents: self.contents_for(path),
            read_only: Arc::clone(&self.read_only),
        }))
    }
}
