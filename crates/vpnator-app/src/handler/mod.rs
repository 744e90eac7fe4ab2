//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `session`: Backend session event handling
//! - `keys`: Key event handlers for UI modes

pub(crate) mod keys;
pub(crate) mod session;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::fmt;

use crate::message::Message;

// Re-export main entry point
pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Open a connection to `endpoint` and send `command` once it is open
    StartSession { endpoint: String, command: String },

    /// Close the connection and drop anything still queued for it
    CloseSession,
}

impl fmt::Debug for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The command line carries passwords.
            UpdateAction::StartSession { endpoint, .. } => f
                .debug_struct("StartSession")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
            UpdateAction::CloseSession => f.write_str("CloseSession"),
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
