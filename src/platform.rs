//! Platform facts that settings depend on.
//!
//! The [`Platform`] trait supplies OS-specific locations and default values.
//! [`HostPlatform`] answers for the operating system the binary was built for.
//!
//! ## Locations
//!
//! - Generic config location: `MP_CONFIG_LOCATION` if set, otherwise the user
//!   config dir (`~/.config` on Linux, `~/Library/Application Support` on
//!   macOS, `%APPDATA%` on Windows)
//! - Daemon config home: `MP_DAEMON_CONFIG_HOME` if set, otherwise
//!   `<config dir>/multipassd`

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Environment variable overriding the generic config location.
pub const CONFIG_LOCATION_ENV: &str = "MP_CONFIG_LOCATION";

/// Environment variable overriding the daemon config home.
pub const DAEMON_CONFIG_HOME_ENV: &str = "MP_DAEMON_CONFIG_HOME";

/// Source of OS-specific paths and setting defaults.
pub trait Platform: Send + Sync {
    /// Directory under which per-application config dirs live.
    fn generic_config_location(&self) -> Result<PathBuf>;

    /// Directory holding the daemon's own config files.
    fn daemon_config_home(&self) -> Result<PathBuf>;

    /// Extra recognized keys and their defaults, for every role.
    ///
    /// Each role only picks up keys in its own namespace.
    fn extra_settings_defaults(&self) -> BTreeMap<String, String>;

    /// Driver used when none is configured.
    fn default_driver(&self) -> String;

    /// Drivers that can be configured on this platform.
    fn supported_drivers(&self) -> Vec<String>;

    /// Privileged mounts policy used when none is configured.
    fn default_privileged_mounts(&self) -> String;

    /// GUI hotkey used when none is configured.
    fn default_hotkey(&self) -> String;
}

/// The platform this binary runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl HostPlatform {
    pub fn new() -> Self {
        Self
    }
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .ok_or_else(|| Error::ConfigLocation("no user config directory".to_string()))
}

impl Platform for HostPlatform {
    fn generic_config_location(&self) -> Result<PathBuf> {
        match env_dir(CONFIG_LOCATION_ENV) {
            Some(dir) => Ok(dir),
            None => user_config_dir(),
        }
    }

    fn daemon_config_home(&self) -> Result<PathBuf> {
        match env_dir(DAEMON_CONFIG_HOME_ENV) {
            Some(dir) => Ok(dir),
            None => Ok(user_config_dir()?.join("multipassd")),
        }
    }

    fn extra_settings_defaults(&self) -> BTreeMap<String, String> {
        let mut extras = BTreeMap::new();
        if cfg!(target_os = "windows") {
            extras.insert(
                "client.apps.windows-terminal.profiles".to_string(),
                "primary".to_string(),
            );
        }
        extras
    }

    fn default_driver(&self) -> String {
        if cfg!(target_os = "windows") {
            "hyperv".to_string()
        } else {
            "qemu".to_string()
        }
    }

    fn supported_drivers(&self) -> Vec<String> {
        let drivers: &[&str] = if cfg!(target_os = "windows") {
            &["hyperv", "virtualbox"]
        } else if cfg!(target_os = "macos") {
            &["qemu", "virtualbox"]
        } else {
            &["qemu", "lxd", "libvirt"]
        };
        drivers.iter().map(|d| d.to_string()).collect()
    }

    fn default_privileged_mounts(&self) -> String {
        if cfg!(target_os = "windows") {
            "false".to_string()
        } else {
            "true".to_string()
        }
    }

    fn default_hotkey(&self) -> String {
        if cfg!(target_os = "macos") {
            "Option+Cmd+U".to_string()
        } else {
            "Ctrl+Alt+U".to_string()
        }
    }
}
