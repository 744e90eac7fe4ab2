//! Backend session event handlers

use tracing::{debug, info, warn};
use vpnator_client::SessionEvent;
use vpnator_core::{classify_message, LogEntry, MessageKind, SessionPhase};

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Route one session event into the state.
///
/// Events that arrive when no session is in progress belong to a session the
/// user already finished or abandoned and are ignored.
pub fn handle_session_event(state: &mut AppState, event: SessionEvent) -> UpdateResult {
    if !state.in_progress() {
        debug!("Ignoring {:?} outside a session", event);
        return UpdateResult::none();
    }

    match event {
        SessionEvent::Opened => {
            info!("Connected to {}", state.endpoint);
            state.phase = SessionPhase::Installing;
            UpdateResult::none()
        }

        SessionEvent::Message(payload) => {
            let text = payload.to_text_lossy();
            match classify_message(&text) {
                MessageKind::EndOfSession => {
                    info!("Backend reported completion");
                    state.phase = SessionPhase::Complete;
                    UpdateResult::action(UpdateAction::CloseSession)
                }
                MessageKind::Info => {
                    state.log.push(LogEntry::info(text));
                    UpdateResult::none()
                }
            }
        }

        SessionEvent::Error(reason) => {
            warn!("Session error: {}", reason);
            fail(state, reason)
        }

        SessionEvent::Closed(info) => {
            warn!("Connection closed before completion: {}", info);
            fail(state, info.to_string())
        }
    }
}

fn fail(state: &mut AppState, reason: String) -> UpdateResult {
    state.phase = SessionPhase::Failed { reason };
    UpdateResult::action(UpdateAction::CloseSession)
}
