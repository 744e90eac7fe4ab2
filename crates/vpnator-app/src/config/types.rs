//! Configuration types for VPNator
//!
//! `Settings` mirrors `config.toml`; every section and field is optional in
//! the file and falls back to its default.

use serde::{Deserialize, Serialize};
use vpnator_core::VpnProtocol;

/// Backend endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws";

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub form: FormSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendSettings {
    /// WebSocket URL of the provisioning backend
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Settings form defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSettings {
    /// Protocol preselected when the form opens
    #[serde(default)]
    pub default_protocol: VpnProtocol,
}

/// Behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Ask before quitting while a session is in progress
    #[serde(default = "default_true")]
    pub confirm_quit: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self { confirm_quit: true }
    }
}

fn default_true() -> bool {
    true
}
