//! # vpnator-core - Core Domain Types
//!
//! Foundation crate for VPNator. Provides domain types, the backend wire
//! protocol, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`VpnProtocol`] - VPN flavour to install (outline, openconnect, xray)
//! - [`ServerConfig`] - One provisioning request built from the settings form
//! - [`RemoteAddress`] - `host[:port]` view of the remote address
//! - [`Payload`] - Text or binary message on the duplex connection
//! - [`LogEntry`], [`MessageKind`] - Received backend lines
//! - [`SessionPhase`] - User-facing session lifecycle
//!
//! ### Wire Protocol (`protocol`)
//! - [`format_install_command()`] - Build the outbound command line
//! - [`classify_message()`] - Detect the completion sentinel
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use vpnator_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod protocol;
pub mod types;

/// Prelude for common imports used throughout all VPNator crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use protocol::{
    classify_message, format_install_command, parse_install_command, COMPLETION_SENTINEL,
    INSTALL_VERB,
};
pub use types::{
    LogEntry, MessageKind, Payload, RemoteAddress, ServerConfig, SessionPhase, VpnCredentials,
    VpnProtocol, DEFAULT_SSH_PORT,
};
