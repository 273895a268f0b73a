//! Settings resolution for the client and the daemon.
//!
//! ## Resolution chain
//!
//! All reads and writes go through a [`SettingsRegistry`], an ordered list of
//! [`SettingsHandler`]s. The first handler that recognizes a key serves it;
//! a key nobody recognizes fails with [`crate::Error::UnrecognizedSetting`].
//!
//! ## Persistent settings
//!
//! [`PersistentSettingsHandler`] recognizes exactly the keys in its default
//! map. Reads return the stored value, falling back to the default. Writes are
//! validated against the key's [`ValueFormat`] before they reach the store.
//!
//! ## Keys
//!
//! Client keys live under `client.`:
//! - `client.primary-name` - Name of the primary instance (default `primary`)
//! - `client.gui.autostart` - Start the tray GUI on login (default `true`)
//! - `client.gui.hotkey` - Global hotkey for the primary instance shell
//!
//! Daemon keys live under `local.`:
//! - `local.driver` - Virtualization backend
//! - `local.bridged-network` - Host interface used for bridged networking
//! - `local.privileged-mounts` - Whether privileged mounts are allowed

pub mod format;
pub mod handler;
pub mod persistent;
pub mod registry;

pub use format::{KeySequence, ValueFormat, parse_bool};
pub use handler::SettingsHandler;
pub use persistent::{PersistentSettingsHandler, SettingSpec};
pub use registry::SettingsRegistry;

/// Namespace of client settings.
pub const CLIENT_NAMESPACE: &str = "client";

/// Namespace of daemon settings.
pub const DAEMON_NAMESPACE: &str = "local";

/// Name of the instance that client commands target by default.
pub const PETENV_KEY: &str = "client.primary-name";

/// Whether the GUI starts automatically.
pub const AUTOSTART_KEY: &str = "client.gui.autostart";

/// Global hotkey that opens a shell in the primary instance.
pub const HOTKEY_KEY: &str = "client.gui.hotkey";

/// Virtualization driver used by the daemon.
pub const DRIVER_KEY: &str = "local.driver";

/// Host network interface used for bridged networking.
pub const BRIDGED_INTERFACE_KEY: &str = "local.bridged-network";

/// Whether privileged mounts are allowed.
pub const MOUNTS_KEY: &str = "local.privileged-mounts";

/// Default primary instance name.
pub const PETENV_DEFAULT: &str = "primary";

/// Default autostart policy.
pub const AUTOSTART_DEFAULT: &str = "true";

/// Check whether `key` belongs to `namespace` (i.e. starts with `namespace.`).
pub fn in_namespace(key: &str, namespace: &str) -> bool {
    key.strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_namespace() {
        assert!(in_namespace("client.a.setting", CLIENT_NAMESPACE));
        assert!(in_namespace("local.blah", DAEMON_NAMESPACE));
        assert!(!in_namespace("abc", CLIENT_NAMESPACE));
        assert!(!in_namespace("clientele.x", CLIENT_NAMESPACE));
        assert!(!in_namespace("client.", CLIENT_NAMESPACE));
        assert!(!in_namespace("local.blah", CLIENT_NAMESPACE));
    }

    #[test]
    fn test_builtin_keys_respect_role_namespaces() {
        for key in [PETENV_KEY, AUTOSTART_KEY, HOTKEY_KEY] {
            assert!(in_namespace(key, CLIENT_NAMESPACE), "{}", key);
        }
        for key in [DRIVER_KEY, BRIDGED_INTERFACE_KEY, MOUNTS_KEY] {
            assert!(in_namespace(key, DAEMON_NAMESPACE), "{}", key);
        }
    }
}
