//! Common test utilities for mpsettings integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real config directory, and `MockPlatform` for library-level tests.

#![allow(dead_code)]

use assert_cmd::Command;
use multipass_settings::Result;
use multipass_settings::platform::Platform;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated config locations.
///
/// - `config_dir`: stands in for the generic config location (client)
/// - `daemon_dir`: stands in for the daemon config home
pub struct TestEnv {
    pub config_dir: TempDir,
    pub daemon_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            daemon_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the mpsettings binary with isolated locations.
    ///
    /// Locations are set per-command for parallel safety.
    pub fn mps(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mpsettings"));
        cmd.env("MP_CONFIG_LOCATION", self.config_dir.path());
        cmd.env("MP_DAEMON_CONFIG_HOME", self.daemon_dir.path());
        cmd.env_remove("MPSETTINGS_ROLE");
        cmd.env_remove("MPSETTINGS_LOG");
        cmd
    }

    /// Path of the client settings file.
    pub fn client_conf(&self) -> PathBuf {
        self.config_dir
            .path()
            .join("multipass")
            .join("multipass.conf")
    }

    /// Path of the daemon settings file.
    pub fn daemon_conf(&self) -> PathBuf {
        self.daemon_dir.path().join("multipassd.conf")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform with every fact set explicitly by the test.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    pub config_location: PathBuf,
    pub daemon_home: PathBuf,
    pub extras: BTreeMap<String, String>,
    pub driver: String,
    pub drivers: Vec<String>,
    pub mounts: String,
    pub hotkey: String,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            config_location: PathBuf::from("/a/b/c"),
            daemon_home: PathBuf::from("/a/b/c"),
            extras: BTreeMap::new(),
            driver: "qemu".to_string(),
            drivers: vec!["qemu".to_string(), "lxd".to_string()],
            mounts: "true".to_string(),
            hotkey: "Ctrl+Alt+U".to_string(),
        }
    }

    pub fn at(location: &Path) -> Self {
        Self {
            config_location: location.to_path_buf(),
            daemon_home: location.to_path_buf(),
            ..Self::new()
        }
    }

    pub fn with_extras<'a>(
        mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.extras
            .extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }
}

impl Platform for MockPlatform {
    fn generic_config_location(&self) -> Result<PathBuf> {
        Ok(self.config_location.clone())
    }

    fn daemon_config_home(&self) -> Result<PathBuf> {
        Ok(self.daemon_home.clone())
    }

    fn extra_settings_defaults(&self) -> BTreeMap<String, String> {
        self.extras.clone()
    }

    fn default_driver(&self) -> String {
        self.driver.clone()
    }

    fn supported_drivers(&self) -> Vec<String> {
        self.drivers.clone()
    }

    fn default_privileged_mounts(&self) -> String {
        self.mounts.clone()
    }

    fn default_hotkey(&self) -> String {
        self.hotkey.clone()
    }
}
