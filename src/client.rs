//! Settings registration for the `multipass` client.
//!
//! The client keeps its settings in `<config>/multipass/multipass.conf`,
//! where `<config>` is the platform's generic config location.

use crate::platform::Platform;
use crate::settings::{
    AUTOSTART_DEFAULT, AUTOSTART_KEY, CLIENT_NAMESPACE, HOTKEY_KEY, PETENV_DEFAULT, PETENV_KEY,
    PersistentSettingsHandler, SettingSpec, SettingsRegistry, ValueFormat, in_namespace,
};
use crate::store::StoreProvider;
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Directory under the generic config location holding client settings.
pub const CLIENT_CONFIG_DIR: &str = "multipass";

/// Client settings file name.
pub const CLIENT_SETTINGS_FILE: &str = "multipass.conf";

/// Location of the client settings file.
pub fn settings_file_path(platform: &dyn Platform) -> Result<PathBuf> {
    Ok(platform
        .generic_config_location()?
        .join(CLIENT_CONFIG_DIR)
        .join(CLIENT_SETTINGS_FILE))
}

/// Built-in client settings.
pub fn builtin_settings(platform: &dyn Platform) -> Vec<SettingSpec> {
    vec![
        SettingSpec::new(PETENV_KEY, PETENV_DEFAULT, ValueFormat::InstanceName),
        SettingSpec::new(AUTOSTART_KEY, AUTOSTART_DEFAULT, ValueFormat::Boolean),
        SettingSpec::new(HOTKEY_KEY, platform.default_hotkey(), ValueFormat::KeySequence),
    ]
}

/// Build the client's persistent handler and add it to `registry`.
///
/// Call once at client startup. Platform extras outside the `client`
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
        .filter(|(key, _)| in_namespace(key, CLIENT_NAMESPACE));

    let handler = Arc::new(
        PersistentSettingsHandler::new(&path, builtin_settings(platform), stores)?
            .with_extra_defaults(extras)?,
    );
    registry.register_handler(handler.clone());

    tracing::info!(path = %path.display(), "registered client settings handler");
    Ok(handler)
}
