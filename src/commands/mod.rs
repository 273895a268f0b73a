//! Command implementations for the mpsettings CLI.
//!
//! Commands take an already built [`SettingsRegistry`] and return results
//! that render as JSON or as human-readable text.

use crate::Result;
use crate::cli::Role;
use crate::platform::Platform;
use crate::settings::SettingsRegistry;
use crate::store::StoreProvider;
use crate::{client, daemon};
use serde::Serialize;
use std::sync::Arc;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Build the registry for `role`, with that role's handler registered.
pub fn open_registry(
    role: Role,
    platform: &dyn Platform,
    stores: Arc<dyn StoreProvider>,
) -> Result<SettingsRegistry> {
    let mut registry = SettingsRegistry::new();
    match role {
        Role::Client => client::register_settings_handlers(&mut registry, platform, stores)?,
        Role::Daemon => daemon::register_settings_handlers(&mut registry, platform, stores)?,
    };
    Ok(registry)
}

/// A single setting and its effective value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingValue {
    pub key: String,
    pub value: String,
}

impl Output for SettingValue {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        self.value.clone()
    }
}

/// Get the effective value of a setting.
pub fn settings_get(registry: &SettingsRegistry, key: &str) -> Result<SettingValue> {
    Ok(SettingValue {
        key: key.to_string(),
        value: registry.get(key)?,
    })
}

/// Outcome of a successful `set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingUpdated {
    pub key: String,
    pub value: String,
    pub previous: String,
}

impl Output for SettingUpdated {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.previous == self.value {
            format!("{} unchanged ({:?})", self.key, self.value)
        } else {
            format!("{}: {:?} -> {:?}", self.key, self.previous, self.value)
        }
    }
}

/// Validate and store a setting.
pub fn settings_set(registry: &SettingsRegistry, key: &str, value: &str) -> Result<SettingUpdated> {
    let previous = registry.get(key)?;
    registry.set(key, value)?;
    Ok(SettingUpdated {
        key: key.to_string(),
        value: value.to_string(),
        previous,
    })
}

/// Every recognized setting with its effective value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsList {
    pub settings: Vec<SettingValue>,
}

impl Output for SettingsList {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.settings.is_empty() {
            return "No settings.".to_string();
        }
        let width = self.settings.iter().map(|s| s.key.len()).max().unwrap_or(0);
        self.settings
            .iter()
            .map(|s| format!("{:width$}  {}", s.key, s.value, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List every recognized setting with its effective value.
pub fn settings_list(registry: &SettingsRegistry) -> Result<SettingsList> {
    let settings = registry
        .keys()
        .into_iter()
        .map(|key| settings_get(registry, &key))
        .collect::<Result<Vec<_>>>()?;
    Ok(SettingsList { settings })
}

/// Recognized setting keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsKeys {
    pub keys: Vec<String>,
}

impl Output for SettingsKeys {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        self.keys.join("\n")
    }
}

/// List recognized setting keys.
pub fn settings_keys(registry: &SettingsRegistry) -> SettingsKeys {
    SettingsKeys {
        keys: registry.keys(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::settings::{AUTOSTART_KEY, DRIVER_KEY, PETENV_KEY};
    use crate::store::MemoryStoreProvider;
    use crate::test_utils::FakePlatform;

    fn registry(role: Role) -> SettingsRegistry {
        open_registry(
            role,
            &FakePlatform::new(),
            Arc::new(MemoryStoreProvider::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_open_registry_per_role() {
        let client = registry(Role::Client);
        assert!(client.keys().contains(&PETENV_KEY.to_string()));
        assert!(!client.keys().contains(&DRIVER_KEY.to_string()));

        let daemon = registry(Role::Daemon);
        assert!(daemon.keys().contains(&DRIVER_KEY.to_string()));
        assert!(!daemon.keys().contains(&PETENV_KEY.to_string()));
    }

    #[test]
    fn test_get_output() {
        let result = settings_get(&registry(Role::Client), PETENV_KEY).unwrap();
        assert_eq!(result.to_human(), "primary");

        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["key"], PETENV_KEY);
        assert_eq!(json["value"], "primary");
    }

    #[test]
    fn test_set_reports_previous_value() {
        let registry = registry(Role::Client);
        let result = settings_set(&registry, AUTOSTART_KEY, "false").unwrap();

        assert_eq!(result.previous, "true");
        assert_eq!(result.value, "false");
        assert!(result.to_human().contains("->"));
        assert_eq!(registry.get(AUTOSTART_KEY).unwrap(), "false");

        let again = settings_set(&registry, AUTOSTART_KEY, "false").unwrap();
        assert!(again.to_human().contains("unchanged"));
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let err = settings_set(&registry(Role::Daemon), PETENV_KEY, "goo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedSetting);
    }

    #[test]
    fn test_list_and_keys() {
        let registry = registry(Role::Daemon);
        let list = settings_list(&registry).unwrap();
        let keys = settings_keys(&registry);

        assert_eq!(list.settings.len(), 3);
        assert_eq!(
            list.settings.iter().map(|s| s.key.clone()).collect::<Vec<_>>(),
            keys.keys
        );
        assert!(list.to_human().contains("local.driver"));
        assert!(keys.to_human().contains("local.privileged-mounts"));
    }
}
