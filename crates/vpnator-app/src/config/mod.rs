//! Configuration for VPNator
//!
//! Supports:
//! - `<config_dir>/vpnator/config.toml` - User settings
//! - `VPNATOR_ENDPOINT` - Backend endpoint override

pub mod priority;
pub mod settings;
pub mod types;

pub use priority::{
    resolve_endpoint, resolve_endpoint_from, validate_endpoint, EndpointSource, ResolvedEndpoint,
    ENDPOINT_ENV_VAR,
};
pub use settings::{default_config_path, load_settings, load_user_settings, CONFIG_FILENAME};
pub use types::*;
