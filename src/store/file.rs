//! TOML file store.
//!
//! Settings are kept in a TOML document. A dotted key `ns.rest` is written to
//! the `[ns]` table under the key `rest`; keys without a namespace live at the
//! document root:
//!
//! ```toml
//! [local]
//! driver = "qemu"
//! privileged-mounts = "true"
//!
//! [client]
//! "gui.hotkey" = "Ctrl+Alt+U"
//! ```
//!
//! Hand-written nested tables such as `[client.gui]` are read as well, and a
//! `set` on a key that already lives in one updates it in place.

use super::{KeyValueStore, StoreProvider, split_key};
use crate::{Error, Result};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;
use toml::{Table, Value};

/// Settings file backed by a TOML document.
///
/// Reads are served from the last loaded document until the file's
/// modification time changes. Every `set` reloads the file, applies the one
/// key, and writes the result back with an atomic replace, so writers sharing
/// a file keep each other's keys.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    table: Table,
    modified: Option<SystemTime>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let modified = modified_at(path)?;
        let table = load(path)?;

        tracing::debug!(path = %path.display(), "opened settings file");

        Ok(Self {
            path: path.to_path_buf(),
            table,
            modified,
        })
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::MalformedStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    /// The document as it is on disk now.
    fn current(&self) -> Result<Cow<'_, Table>> {
        if modified_at(&self.path)? == self.modified {
            return Ok(Cow::Borrowed(&self.table));
        }
        tracing::debug!(path = %self.path.display(), "settings file changed on disk");
        Ok(Cow::Owned(load(&self.path)?))
    }

    fn reload(&mut self) -> Result<()> {
        let modified = modified_at(&self.path)?;
        if modified != self.modified {
            self.table = load(&self.path)?;
            self.modified = modified;
        }
        Ok(())
    }

    /// Write `table` to disk, replacing the current file atomically.
    fn persist(&self, table: &Table) -> Result<()> {
        let contents = toml::to_string(table).map_err(|e| self.malformed(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    fn insert(&self, table: &mut Table, key: &str, value: Value) -> Result<()> {
        if let Some(existing) = find_mut(table, key) {
            *existing = value;
            return Ok(());
        }

        match split_key(key) {
            (Some(namespace), rest) => {
                let section = table
                    .entry(namespace.to_string())
                    .or_insert_with(|| Value::Table(Table::new()));
                match section {
                    Value::Table(section) if section.get(rest).is_some_and(Value::is_table) => {
                        return Err(self.malformed(format!("{} is a table of settings", key)));
                    }
                    Value::Table(section) => {
                        section.insert(rest.to_string(), value);
                    }
                    _ => {
                        return Err(
                            self.malformed(format!("{} is not a table of settings", namespace))
                        );
                    }
                }
            }
            (None, key) => {
                if matches!(table.get(key), Some(Value::Table(_))) {
                    return Err(self.malformed(format!("{} is a table of settings", key)));
                }
                table.insert(key.to_string(), value);
            }
        }
        Ok(())
    }
}

fn load(path: &Path) -> Result<Table> {
    match fs::read_to_string(path) {
        Ok(contents) => contents
            .parse::<Table>()
            .map_err(|e| Error::MalformedStore {
                path: path.to_path_buf(),
                reason: e.message().to_string(),
            }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Table::new()),
        Err(e) => Err(e.into()),
    }
}

/// Modification time of `path`, `None` when the file does not exist.
fn modified_at(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.modified().ok()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find the value for a dotted `key`, either as a literal key or by walking
/// nested tables. A literal key at a level wins over a nested path.
fn find<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    match table.get(key) {
        Some(value) if !value.is_table() => return Some(value),
        _ => {}
    }
    for (i, _) in key.match_indices('.') {
        if let Some(Value::Table(inner)) = table.get(&key[..i]) {
            if let Some(value) = find(inner, &key[i + 1..]) {
                return Some(value);
            }
        }
    }
    table.get(key)
}

fn find_mut<'a>(table: &'a mut Table, key: &str) -> Option<&'a mut Value> {
    if table.get(key).is_some_and(|v| !v.is_table()) {
        return table.get_mut(key);
    }
    for (i, _) in key.match_indices('.') {
        let (prefix, rest) = (&key[..i], &key[i + 1..]);
        let found = match table.get(prefix) {
            Some(Value::Table(inner)) => find(inner, rest).is_some_and(|v| !v.is_table()),
            _ => false,
        };
        if found {
            return table
                .get_mut(prefix)
                .and_then(Value::as_table_mut)
                .and_then(|inner| find_mut(inner, rest));
        }
    }
    None
}

/// Text of a scalar value. Floats keep a TOML float literal (`3.0`, not `3`).
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) if f.is_nan() => Some("nan".to_string()),
        Value::Float(f) => Some(format!("{:?}", f)),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let table = self.current()?;
        match find(&table, key) {
            None => Ok(None),
            Some(value) => scalar_text(value)
                .map(Some)
                .ok_or_else(|| self.malformed(format!("{} is not a scalar value", key))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut table = load(&self.path)?;
        self.insert(&mut table, key, Value::String(value.to_string()))?;

        self.persist(&table)?;
        self.table = table;
        self.modified = modified_at(&self.path)?;

        tracing::debug!(path = %self.path.display(), key, "wrote setting");
        Ok(())
    }

    /// Writes are already durable once `set` returns; this picks up changes
    /// made by other writers.
    fn sync(&mut self) -> Result<()> {
        self.reload()
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Opens [`FileStore`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStoreProvider;

impl StoreProvider for FileStoreProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn KeyValueStore>> {
        Ok(Box::new(FileStore::open(path)?))
    }
}
