//! Settings file loading

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::types::Settings;

/// Directory under the platform config dir
pub const CONFIG_DIR_NAME: &str = "vpnator";

pub const CONFIG_FILENAME: &str = "config.toml";

/// `<config_dir>/vpnator/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
}

/// Load settings from `config_path`.
///
/// A missing file yields defaults; an unreadable or invalid file is logged and
/// also yields defaults.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from an explicit path, or from the default location.
pub fn load_user_settings(explicit: Option<&Path>) -> Settings {
    match explicit {
        Some(path) => load_settings(path),
        None => match default_config_path() {
            Some(path) => load_settings(&path),
            None => {
                debug!("No platform config directory, using default settings");
                Settings::default()
            }
        },
    }
}
