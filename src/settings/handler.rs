//! The settings handler trait.

use crate::Result;

/// A unit of settings recognition.
///
/// Each handler owns a slice of the key space. For keys outside that slice,
/// both `get` and `set` fail with [`crate::Error::UnrecognizedSetting`], which
/// tells the registry to ask the next handler.
pub trait SettingsHandler: Send + Sync {
    /// Check whether this handler serves `key`.
    fn recognizes(&self, key: &str) -> bool;

    /// All keys this handler serves, sorted.
    fn keys(&self) -> Vec<String>;

    /// Get the effective value of `key`.
    fn get(&self, key: &str) -> Result<String>;

    /// Validate and store `value` for `key`.
    ///
    /// On error nothing is stored.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
