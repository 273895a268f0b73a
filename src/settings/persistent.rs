//! Settings handler backed by a key-value store.

use super::format::ValueFormat;
use super::handler::SettingsHandler;
use crate::store::{KeyValueStore, StoreProvider};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// A recognized setting: its key, default value and value format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingSpec {
    pub key: String,
    pub default: String,
    pub format: ValueFormat,
}

impl SettingSpec {
    /// Create a spec for `key`.
    pub fn new(key: impl Into<String>, default: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            format,
        }
    }

    /// Create a spec for a key that accepts any text.
    pub fn text(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(key, default, ValueFormat::Text)
    }
}

/// Serves a fixed set of keys from one settings file.
///
/// The default map is assembled at construction and never changes. The store
/// is opened on first access and kept for the lifetime of the handler; all
/// store access is serialized through one lock.
pub struct PersistentSettingsHandler {
    path: PathBuf,
    settings: BTreeMap<String, SettingSpec>,
    provider: Arc<dyn StoreProvider>,
    store: Mutex<Option<Box<dyn KeyValueStore>>>,
}

impl PersistentSettingsHandler {
    /// Create a handler for the settings file at `path`.
    ///
    /// Fails with `ConflictingDefault` if a key appears twice in `specs`.
    pub fn new(
        path: impl Into<PathBuf>,
        specs: impl IntoIterator<Item = SettingSpec>,
        provider: Arc<dyn StoreProvider>,
    ) -> Result<Self> {
        let mut settings = BTreeMap::new();
        for spec in specs {
            if settings.contains_key(&spec.key) {
                return Err(Error::ConflictingDefault { key: spec.key });
            }
            settings.insert(spec.key.clone(), spec);
        }

        Ok(Self {
            path: path.into(),
            settings,
            provider,
            store: Mutex::new(None),
        })
    }

    /// Add extra recognized keys, accepting any text.
    ///
    /// An extra key that is already recognized is a construction error: it
    /// neither overrides nor yields to the existing default.
    pub fn with_extra_defaults(
        mut self,
        extras: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        for (key, default) in extras {
            if self.settings.contains_key(&key) {
                return Err(Error::ConflictingDefault { key });
            }
            self.settings
                .insert(key.clone(), SettingSpec::text(key, default));
        }
        Ok(self)
    }

    /// Path of the backing settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default value of a recognized key.
    pub fn default_for(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|s| s.default.as_str())
    }

    /// Value format of a recognized key.
    pub fn format_for(&self, key: &str) -> Option<&ValueFormat> {
        self.settings.get(key).map(|s| &s.format)
    }

    fn spec(&self, key: &str) -> Result<&SettingSpec> {
        self.settings
            .get(key)
            .ok_or_else(|| Error::unrecognized(key))
    }

    /// Run `op` against the store, opening it first if needed.
    fn with_store<T>(&self, op: impl FnOnce(&mut dyn KeyValueStore) -> Result<T>) -> Result<T> {
        let mut guard = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        let store = match guard.take() {
            Some(store) => store,
            None => {
                tracing::debug!(path = %self.path.display(), "opening settings store");
                self.provider.open(&self.path)?
            }
        };
        op(guard.insert(store).as_mut())
    }
}

impl SettingsHandler for PersistentSettingsHandler {
    fn recognizes(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.settings.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Result<String> {
        let spec = self.spec(key)?;
        let stored = self.with_store(|store| store.get(key))?;
        Ok(stored.unwrap_or_else(|| spec.default.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let spec = self.spec(key)?;
        if !spec.format.accepts(value) {
            return Err(Error::invalid(key, value, spec.format.describe()));
        }

        self.with_store(|store| {
            store.set(key, value)?;
            store.sync()
        })?;

        tracing::debug!(key, value, path = %self.path.display(), "setting stored");
        Ok(())
    }
}

impl fmt::Debug for PersistentSettingsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentSettingsHandler")
            .field("path", &self.path)
            .field("keys", &self.settings.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
