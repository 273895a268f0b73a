//! Ordered dispatch of settings requests to handlers.

use super::format::parse_bool;
use super::handler::SettingsHandler;
use crate::{Error, ErrorKind, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The single dispatch point for settings access.
///
/// Handlers are asked in registration order; the first one that does not
/// answer `UnrecognizedSetting` decides the outcome. Build one registry at
/// startup, register the role's handlers, then share it by reference.
#[derive(Default)]
pub struct SettingsRegistry {
    handlers: Vec<Arc<dyn SettingsHandler>>,
}

impl SettingsRegistry {
    /// Create a registry with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the chain.
    ///
    /// Returns `false` without changing anything if this exact handler
    /// instance is already registered.
    pub fn register_handler(&mut self, handler: Arc<dyn SettingsHandler>) -> bool {
        let incoming = Arc::as_ptr(&handler) as *const ();
        if self
            .handlers
            .iter()
            .any(|h| Arc::as_ptr(h) as *const () == incoming)
        {
            tracing::warn!("settings handler registered twice; ignoring");
            return false;
        }
        self.handlers.push(handler);
        true
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Get the effective value of `key` from the first handler that serves it.
    pub fn get(&self, key: &str) -> Result<String> {
        self.dispatch(key, |handler| handler.get(key))
    }

    /// Set `key` through the first handler that serves it.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.dispatch(key, |handler| handler.set(key, value))
    }

    /// Get `key` and parse it into `T`.
    ///
    /// A stored value that does not parse is reported as
    /// `InvalidSettingValue`.
    pub fn get_as<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.get(key)?;
        value
            .parse::<T>()
            .map_err(|e| Error::invalid(key, &value, e.to_string()))
    }

    /// Get `key` as a boolean-like value.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get(key)?;
        parse_bool(&value).ok_or_else(|| Error::invalid(key, &value, "a boolean"))
    }

    /// All keys served by any handler, sorted and deduplicated.
    pub fn keys(&self) -> Vec<String> {
        self.handlers
            .iter()
            .flat_map(|h| h.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn dispatch<T>(
        &self,
        key: &str,
        mut op: impl FnMut(&dyn SettingsHandler) -> Result<T>,
    ) -> Result<T> {
        for handler in &self.handlers {
            match op(handler.as_ref()) {
                Err(e) if e.kind() == ErrorKind::UnrecognizedSetting => continue,
                other => return other,
            }
        }
        Err(Error::unrecognized(key))
    }
}

impl fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
