//! vpnator-app - Application state and orchestration for VPNator
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the settings form, the message log, the `update()` function,
//! and the Engine that executes update actions against the backend session.
//! It also loads configuration and resolves the backend endpoint.

pub mod config;
pub mod engine;
pub mod engine_event;
pub mod form;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod message_log;
pub mod signals;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use form::{FieldId, FormField, SettingsForm};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use message_log::{LogViewState, MessageLog};
pub use state::{AppState, UiMode};

// Re-export session types for runners
pub use vpnator_client::{ConnectionState, SessionEvent};
