//! Multipass settings - resolution and persistence of named settings.
//!
//! This library provides the settings core shared by the `multipass` client and
//! the `multipassd` daemon: an ordered registry of settings handlers, a
//! persistent handler backed by a key-value file, and the per-role
//! registration functions that wire them together at startup.

pub mod cli;
pub mod client;
pub mod commands;
pub mod daemon;
pub mod platform;
pub mod settings;
pub mod store;

use std::path::PathBuf;


/// Broad category of a settings failure, for callers that branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No handler recognizes the key
    UnrecognizedSetting,
    /// The key is recognized but the value has the wrong format
    InvalidSettingValue,
    /// Handler construction or location resolution failed
    Configuration,
    /// The backing key-value store could not be read or written
    Store,
}

/// Library-level error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unrecognized setting: {key}")]
    UnrecognizedSetting { key: String },

    #[error("Invalid setting value for {key}: \"{value}\" (expected {expected})")]
    InvalidSettingValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Conflicting default for setting: {key}")]
    ConflictingDefault { key: String },

    #[error("Could not determine config location: {0}")]
    ConfigLocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings file {}: {reason}", .path.display())]
    MalformedStore { path: PathBuf, reason: String },
}

impl Error {
    /// Shorthand for an unrecognized-key error.
    pub fn unrecognized(key: impl Into<String>) -> Self {
        Self::UnrecognizedSetting { key: key.into() }
    }

    /// Shorthand for a value that failed validation.
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidSettingValue {
            key: key.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedSetting { .. } => ErrorKind::UnrecognizedSetting,
            Self::InvalidSettingValue { .. } => ErrorKind::InvalidSettingValue,
            Self::ConflictingDefault { .. } | Self::ConfigLocation(_) => ErrorKind::Configuration,
            Self::Io(_) | Self::MalformedStore { .. } => ErrorKind::Store,
        }
    }

    /// The setting key this error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::UnrecognizedSetting { key }
            | Self::InvalidSettingValue { key, .. }
            | Self::ConflictingDefault { key } => Some(key.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::unrecognized("abc").kind(),
            ErrorKind::UnrecognizedSetting
        );
        assert_eq!(
            Error::invalid("k", "v", "a boolean").kind(),
            ErrorKind::InvalidSettingValue
        );
        assert_eq!(
            Error::ConflictingDefault {
                key: "k".to_string()
            }
            .kind(),
            ErrorKind::Configuration
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(Error::from(io).kind(), ErrorKind::Store);
    }

    #[test]
    fn test_error_messages_name_the_key() {
        let err = Error::unrecognized("client.nope");
        assert!(err.to_string().contains("client.nope"));
        assert_eq!(err.key(), Some("client.nope"));

        let err = Error::invalid("local.driver", "bogus", "one of: qemu, lxd");
        let msg = err.to_string();
        assert!(msg.contains("local.driver"));
        assert!(msg.contains("bogus"));
        assert!(msg.contains("qemu, lxd"));
    }
}
