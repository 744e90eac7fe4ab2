//! # vpnator-client - Backend Session Management
//!
//! Owns the single duplex connection to the provisioning backend: opening and
//! superseding it, queueing payloads until it is open, and surfacing its
//! lifecycle as [`SessionEvent`]s.
//!
//! Depends on [`vpnator_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Session
//! - [`SessionManager`] - Open/send/close and the event stream
//! - [`ConnectionState`] - Idle, Connecting, Open, Closed
//! - [`SessionEvent`] - Opened, Message, Error, Closed
//!
//! ### Transport
//! - [`Connector`] - Pluggable transport seam
//! - [`WsConnector`] - WebSocket transport (tokio-tungstenite)
//! - [`CloseInfo`] - Close code and reason reported by the peer

pub mod connector;
pub mod queue;
pub mod session;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use connector::{
    CloseInfo, Connection, Connector, Frame, FrameStream, PayloadSink, WsConnector,
};
pub use queue::OutboundQueue;
pub use session::{ConnectionId, ConnectionState, SessionEvent, SessionManager};
