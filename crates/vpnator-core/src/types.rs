//! Core domain types

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// SSH port assumed by the backend when the address carries none.
pub const DEFAULT_SSH_PORT: u16 = 22;

// ─────────────────────────────────────────────────────────────────
// VPN protocol
// ─────────────────────────────────────────────────────────────────

/// VPN flavour the backend should install on the remote server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnProtocol {
    #[default]
    Outline,
    OpenConnect,
    Xray,
}

impl VpnProtocol {
    /// Every protocol, in selector order.
    pub const ALL: [VpnProtocol; 3] = [
        VpnProtocol::Outline,
        VpnProtocol::OpenConnect,
        VpnProtocol::Xray,
    ];

    /// Wire name used in the install command
    pub fn as_str(&self) -> &'static str {
        match self {
            VpnProtocol::Outline => "outline",
            VpnProtocol::OpenConnect => "openconnect",
            VpnProtocol::Xray => "xray",
        }
    }

    /// Human-readable name for selectors
    pub fn label(&self) -> &'static str {
        match self {
            VpnProtocol::Outline => "Outline",
            VpnProtocol::OpenConnect => "OpenConnect",
            VpnProtocol::Xray => "XRay",
        }
    }

    /// Whether the protocol needs its own username/password pair
    pub fn requires_vpn_credentials(&self) -> bool {
        matches!(self, VpnProtocol::OpenConnect)
    }

    /// Next protocol in selector order (wraps)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous protocol in selector order (wraps)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

impl fmt::Display for VpnProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VpnProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outline" => Ok(VpnProtocol::Outline),
            "openconnect" => Ok(VpnProtocol::OpenConnect),
            "xray" => Ok(VpnProtocol::Xray),
            other => Err(Error::validation(
                "Protocol",
                format!("unknown VPN protocol '{other}'"),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Server configuration
// ─────────────────────────────────────────────────────────────────

/// Credentials used inside the VPN itself (openconnect accounts)
#[derive(Clone, PartialEq, Eq)]
pub struct VpnCredentials {
    pub username: String,
    pub password: String,
}

impl VpnCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for VpnCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VpnCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One provisioning request, as submitted from the settings form
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Remote server address, optionally `host:port`
    pub remote_address: String,
    /// SSH username on the remote server
    pub username: String,
    /// SSH password on the remote server
    pub password: String,
    pub protocol: VpnProtocol,
    /// Present only when `protocol.requires_vpn_credentials()`
    pub vpn_credentials: Option<VpnCredentials>,
}

impl ServerConfig {
    pub fn new(
        protocol: VpnProtocol,
        remote_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            remote_address: remote_address.into(),
            username: username.into(),
            password: password.into(),
            protocol,
            vpn_credentials: None,
        }
    }

    pub fn with_vpn_credentials(mut self, credentials: VpnCredentials) -> Self {
        self.vpn_credentials = Some(credentials);
        self
    }

    /// Parsed view of `remote_address`
    pub fn remote(&self) -> RemoteAddress {
        RemoteAddress::parse(&self.remote_address)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("remote_address", &self.remote_address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("protocol", &self.protocol)
            .field("vpn_credentials", &self.vpn_credentials)
            .finish()
    }
}

/// Host and optional port split out of a user-supplied address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    pub host: String,
    pub port: Option<u16>,
}

impl RemoteAddress {
    /// Split `host:port`.
    ///
    /// When the text after the last colon is not a valid port the whole input
    /// is treated as the host, matching how the backend resolves SSH targets.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some((host, port)) = input.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                return Self {
                    host: host.to_string(),
                    port: Some(port),
                };
            }
        }
        Self {
            host: input.to_string(),
            port: None,
        }
    }

    /// Port the backend will use for SSH
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.effective_port())
    }
}

// ─────────────────────────────────────────────────────────────────
// Wire payloads
// ─────────────────────────────────────────────────────────────────

/// One message exchanged over the duplex connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    /// Borrow the text content, if this is a text payload
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Binary(_) => None,
        }
    }

    /// Text content, decoding binary payloads lossily
    pub fn to_text_lossy(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Text(text) => text.len(),
            Payload::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

// ─────────────────────────────────────────────────────────────────
// Message log
// ─────────────────────────────────────────────────────────────────

/// Counter for generating unique log entry IDs
static LOG_ENTRY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Classification of an inbound backend message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary progress line
    Info,
    /// The completion sentinel
    EndOfSession,
}

/// A received backend line
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub kind: MessageKind,
    pub message: String,
    /// Unique, increasing ID (receive order across the process)
    pub id: u64,
}

impl LogEntry {
    /// Create a new log entry with current timestamp
    pub fn new(kind: MessageKind, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            kind,
            message: message.into(),
            id: LOG_ENTRY_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Create an info entry
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, message)
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

// ─────────────────────────────────────────────────────────────────
// Session phase
// ─────────────────────────────────────────────────────────────────

/// Where the current provisioning session stands, from the user's view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Request submitted, waiting for the connection to open
    Connecting,
    /// Connection open, progress lines streaming in
    Installing,
    /// Sentinel received
    Complete,
    /// Connection dropped or failed before the sentinel
    Failed { reason: String },
    /// User cancelled the session
    Cancelled,
}

impl SessionPhase {
    /// A session is in flight (form locked, progress indicator shown)
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SessionPhase::Connecting | SessionPhase::Installing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Connecting => "Connecting",
            SessionPhase::Installing => "Installing",
            SessionPhase::Complete => "Complete",
            SessionPhase::Failed { .. } => "Failed",
            SessionPhase::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_wire_names() {
        assert_eq!(VpnProtocol::Outline.as_str(), "outline");
        assert_eq!(VpnProtocol::OpenConnect.as_str(), "openconnect");
        assert_eq!(VpnProtocol::Xray.as_str(), "xray");
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!(
            "OpenConnect".parse::<VpnProtocol>().unwrap(),
            VpnProtocol::OpenConnect
        );
        assert_eq!(" xray ".parse::<VpnProtocol>().unwrap(), VpnProtocol::Xray);
        assert!("openvpn".parse::<VpnProtocol>().is_err());
    }

    #[test]
    fn test_protocol_serde_matches_wire_names() {
        let json = serde_json::to_string(&VpnProtocol::OpenConnect).unwrap();
        assert_eq!(json, "\"openconnect\"");
        let parsed: VpnProtocol = serde_json::from_str("\"outline\"").unwrap();
        assert_eq!(parsed, VpnProtocol::Outline);
    }

    #[test]
    fn test_only_openconnect_requires_vpn_credentials() {
        assert!(VpnProtocol::OpenConnect.requires_vpn_credentials());
        assert!(!VpnProtocol::Outline.requires_vpn_credentials());
        assert!(!VpnProtocol::Xray.requires_vpn_credentials());
    }

    #[test]
    fn test_protocol_cycling_wraps() {
        assert_eq!(VpnProtocol::Outline.next(), VpnProtocol::OpenConnect);
        assert_eq!(VpnProtocol::Xray.next(), VpnProtocol::Outline);
        assert_eq!(VpnProtocol::Outline.prev(), VpnProtocol::Xray);
    }

    #[test]
    fn test_remote_address_plain_host() {
        let addr = RemoteAddress::parse("1.2.3.4");
        assert_eq!(addr.host, "1.2.3.4");
        assert_eq!(addr.port, None);
        assert_eq!(addr.effective_port(), 22);
    }

    #[test]
    fn test_remote_address_with_port() {
        let addr = RemoteAddress::parse("1.2.3.4:2222");
        assert_eq!(addr.host, "1.2.3.4");
        assert_eq!(addr.port, Some(2222));
        assert_eq!(addr.to_string(), "1.2.3.4:2222");
    }

    #[test]
    fn test_remote_address_invalid_port_keeps_whole_host() {
        let addr = RemoteAddress::parse("vpn.example.com:ssh");
        assert_eq!(addr.host, "vpn.example.com:ssh");
        assert_eq!(addr.port, None);
    }

    #[test]
    fn test_server_config_debug_redacts_passwords() {
        let config = ServerConfig::new(VpnProtocol::OpenConnect, "1.2.3.4", "bob", "secret")
            .with_vpn_credentials(VpnCredentials::new("vu", "vp"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("\"vp\""));
        assert!(debug.contains("bob"));
    }

    #[test]
    fn test_payload_text_access() {
        let text = Payload::from("hello");
        assert_eq!(text.as_text(), Some("hello"));

        let binary = Payload::from(b"hi".to_vec());
        assert_eq!(binary.as_text(), None);
        assert_eq!(binary.to_text_lossy(), "hi");
        assert_eq!(binary.len(), 2);
    }

    #[test]
    fn test_log_entry_ids_increase() {
        let first = LogEntry::info("one");
        let second = LogEntry::info("two");
        assert!(second.id > first.id);
        assert_eq!(first.kind, MessageKind::Info);
    }

    #[test]
    fn test_session_phase_in_progress() {
        assert!(SessionPhase::Connecting.is_in_progress());
        assert!(SessionPhase::Installing.is_in_progress());
        assert!(!SessionPhase::Complete.is_in_progress());
        assert!(!SessionPhase::Failed {
            reason: "x".into()
        }
        .is_in_progress());
    }
}
