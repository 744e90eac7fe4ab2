//! Backend wire protocol
//!
//! Outbound requests are a single space-delimited text line:
//!
//! ```text
//! install <protocol> <remoteAddress> <username> <password> [<vpnUsername> <vpnPassword>]
//! ```
//!
//! Inbound messages are plain progress lines, except for the exact
//! [`COMPLETION_SENTINEL`] which ends the session.

use crate::error::{Error, Result};
use crate::types::{MessageKind, ServerConfig, VpnCredentials, VpnProtocol};

/// Literal the backend sends once provisioning has finished.
pub const COMPLETION_SENTINEL: &str = "VPNATOR-COMPLETE";

/// Command verb understood by the backend.
pub const INSTALL_VERB: &str = "install";

/// Format the install command for `config`.
///
/// The VPN credential pair is appended only when the config carries it.
pub fn format_install_command(config: &ServerConfig) -> String {
    let mut command = format!(
        "{} {} {} {} {}",
        INSTALL_VERB,
        config.protocol.as_str(),
        config.remote_address,
        config.username,
        config.password
    );
    if let Some(ref creds) = config.vpn_credentials {
        command.push(' ');
        command.push_str(&creds.username);
        command.push(' ');
        command.push_str(&creds.password);
    }
    command
}

/// Parse an install command back into a [`ServerConfig`].
///
/// This is the backend's view of the line; the test backend uses it to check
/// what the client sent.
pub fn parse_install_command(line: &str) -> Result<ServerConfig> {
    let rest = line
        .strip_prefix(INSTALL_VERB)
        .ok_or_else(|| Error::protocol(format!("not an install command: {line}")))?;
    let args: Vec<&str> = rest.split_whitespace().collect();

    match args.as_slice() {
        [protocol, address, username, password] => Ok(ServerConfig::new(
            protocol.parse::<VpnProtocol>()?,
            *address,
            *username,
            *password,
        )),
        [protocol, address, username, password, vpn_username, vpn_password] => {
            Ok(ServerConfig::new(
                protocol.parse::<VpnProtocol>()?,
                *address,
                *username,
                *password,
            )
            .with_vpn_credentials(VpnCredentials::new(*vpn_username, *vpn_password)))
        }
        _ => Err(Error::protocol(format!(
            "install expects 4 or 6 arguments, got {}",
            args.len()
        ))),
    }
}

/// Classify an inbound line. Only an exact match is the sentinel.
pub fn classify_message(text: &str) -> MessageKind {
    if text == COMPLETION_SENTINEL {
        MessageKind::EndOfSession
    } else {
        MessageKind::Info
    }
}
