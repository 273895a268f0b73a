//! Settings registration for the `multipassd` daemon.
//!
//! The daemon keeps its settings in `<daemon config home>/multipassd.conf`.

use crate::platform::Platform;
use crate::settings::{
    BRIDGED_INTERFACE_KEY, DAEMON_NAMESPACE, DRIVER_KEY, MOUNTS_KEY, PersistentSettingsHandler,
    SettingSpec, SettingsRegistry, ValueFormat, in_namespace,
};
use crate::store::StoreProvider;
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Daemon settings file name.
pub const DAEMON_SETTINGS_FILE: &str = "multipassd.conf";

/// Location of the daemon settings file.
pub fn settings_file_path(platform: &dyn Platform) -> Result<PathBuf> {
    Ok(platform.daemon_config_home()?.join(DAEMON_SETTINGS_FILE))
}

/// Built-in daemon settings.
pub fn builtin_settings(platform: &dyn Platform) -> Vec<SettingSpec> {
    vec![
        SettingSpec::new(
            DRIVER_KEY,
            platform.default_driver(),
            ValueFormat::OneOf(platform.supported_drivers()),
        ),
        SettingSpec::text(BRIDGED_INTERFACE_KEY, ""),
        SettingSpec::new(
            MOUNTS_KEY,
            platform.default_privileged_mounts(),
            ValueFormat::Boolean,
        ),
    ]
}

/// Build the daemon's persistent handler and add it to `registry`.
///
/// Call once at daemon startup. Platform extras outside the `local`
/// namespace are ignored.
pub fn register_settings_handlers(
    registry: &mut SettingsRegistry,
    platform: &dyn Platform,
    stores: Arc<dyn StoreProvider>,
) -> Result<Arc<PersistentSettingsHandler>> {
    let path = settings_file_path(platform)?;
    let extras = platform
        .extra_settings_defaults()
        .into_iter()
        .filter(|(key, _)| in_namespace(key, DAEMON_NAMESPACE));

    let handler = Arc::new(
        PersistentSettingsHandler::new(&path, builtin_settings(platform), stores)?
            .with_extra_defaults(extras)?,
    );
    registry.register_handler(handler.clone());

    tracing::info!(path = %path.display(), "registered daemon settings handler");
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::settings::SettingsHandler;
    use crate::store::MemoryStoreProvider;
    use crate::test_utils::FakePlatform;

    #[test]
    fn test_settings_file_path() {
        let platform = FakePlatform {
            daemon_home: PathBuf::from("/var/lib/multipassd"),
            ..FakePlatform::new()
        };
        assert_eq!(
            settings_file_path(&platform).unwrap(),
            PathBuf::from("/var/lib/multipassd/multipassd.conf")
        );
    }

    #[test]
    fn test_builtin_defaults_come_from_platform() {
        let platform = FakePlatform {
            driver: "conductor".to_string(),
            drivers: vec!["conductor".to_string()],
            mounts: "false".to_string(),
            ..FakePlatform::new()
        };
        let mut registry = SettingsRegistry::new();
        register_settings_handlers(&mut registry, &platform, Arc::new(MemoryStoreProvider::new()))
            .unwrap();

        assert_eq!(registry.get(DRIVER_KEY).unwrap(), "conductor");
        assert_eq!(registry.get(BRIDGED_INTERFACE_KEY).unwrap(), "");
        assert_eq!(registry.get(MOUNTS_KEY).unwrap(), "false");
    }

    #[test]
    fn test_driver_must_be_supported() {
        let platform = FakePlatform::new();
        let mut registry = SettingsRegistry::new();
        register_settings_handlers(&mut registry, &platform, Arc::new(MemoryStoreProvider::new()))
            .unwrap();

        registry.set(DRIVER_KEY, "lxd").unwrap();
        assert_eq!(registry.get(DRIVER_KEY).unwrap(), "lxd");

        let err = registry.set(DRIVER_KEY, "virtualbox").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSettingValue);
        assert!(err.to_string().contains("qemu, lxd"));
        assert_eq!(registry.get(DRIVER_KEY).unwrap(), "lxd");
    }

    #[test]
    fn test_bridged_interface_accepts_any_text() {
        let mut registry = SettingsRegistry::new();
        register_settings_handlers(
            &mut registry,
            &FakePlatform::new(),
            Arc::new(MemoryStoreProvider::new()),
        )
        .unwrap();

        registry.set(BRIDGED_INTERFACE_KEY, "bridge").unwrap();
        assert_eq!(registry.get(BRIDGED_INTERFACE_KEY).unwrap(), "bridge");
    }

    #[test]
    fn test_only_daemon_extras_are_recognized() {
        let platform = FakePlatform::new().with_extras([
            ("local.blah", "blargh"),
            ("local.a.long.number", "1234567890"),
            ("zxy", "0"),
            ("client.a.setting", "nope"),
        ]);
        let mut registry = SettingsRegistry::new();
        let handler = register_settings_handlers(
            &mut registry,
            &platform,
            Arc::new(MemoryStoreProvider::new()),
        )
        .unwrap();

        assert_eq!(handler.get("local.blah").unwrap(), "blargh");
        assert_eq!(handler.get("local.a.long.number").unwrap(), "1234567890");
        for other in ["zxy", "client.a.setting"] {
            let err = handler.get(other).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnrecognizedSetting);
            assert!(err.to_string().contains(other));
        }
    }
}
