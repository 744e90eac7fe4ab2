//! Headless mode - NDJSON event output instead of the TUI
//!
//! Headless mode submits one install request built from command-line flags
//! and reports its progress as newline-delimited JSON on stdout, one event
//! per line. Scripts can follow a provisioning run without parsing a
//! terminal UI.
//!
//! # Example Output
//!
//! ```json
//! {"event":"submitted","protocol":"outline","remote":"1.2.3.4:22","endpoint":"ws://127.0.0.1:8000/ws","timestamp":1704700001000}
//! {"event":"connected","endpoint":"ws://127.0.0.1:8000/ws","timestamp":1704700001050}
//! {"event":"message","message":"Installing outline...","timestamp":1704700002000}
//! {"event":"complete","timestamp":1704700090000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;
use vpnator_core::Result;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The install request passed validation and a connection was requested
    Submitted {
        protocol: String,
        remote: String,
        endpoint: String,
        timestamp: i64,
    },

    /// The backend connection opened; the request is on its way
    Connected { endpoint: String, timestamp: i64 },

    /// One progress line from the backend
    Message { message: String, timestamp: i64 },

    /// The backend reported that provisioning finished
    Complete { timestamp: i64 },

    /// The request was rejected or the connection failed
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// The session ended without completing
    Disconnected {
        reason: Option<String>,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match self.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Milliseconds since the Unix epoch
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            HeadlessEvent::Submitted { .. } => "submitted",
            HeadlessEvent::Connected { .. } => "connected",
            HeadlessEvent::Message { .. } => "message",
            HeadlessEvent::Complete { .. } => "complete",
            HeadlessEvent::Error { .. } => "error",
            HeadlessEvent::Disconnected { .. } => "disconnected",
        }
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn submitted(protocol: &str, remote: &str, endpoint: &str) -> Self {
        Self::Submitted {
            protocol: protocol.to_string(),
            remote: remote.to_string(),
            endpoint: endpoint.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn connected(endpoint: &str) -> Self {
        Self::Connected {
            endpoint: endpoint.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
            timestamp: Self::now(),
        }
    }

    pub fn complete() -> Self {
        Self::Complete {
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    pub fn disconnected(reason: Option<String>) -> Self {
        Self::Disconnected {
            reason,
            timestamp: Self::now(),
        }
    }
}
