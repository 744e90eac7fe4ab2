//! Main update function - handles state transitions (TEA pattern)

use tracing::{debug, info};
use vpnator_core::{format_install_command, SessionPhase};

use crate::form::SettingsForm;
use crate::message::Message;
use crate::state::AppState;

use super::{keys::handle_key, session::handle_session_event, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Session(event) => handle_session_event(state, event),

        // ─────────────────────────────────────────────────────────
        // Form Messages
        // ─────────────────────────────────────────────────────────
        Message::FocusNext => edit_form(state, |form| form.focus_next()),
        Message::FocusPrev => edit_form(state, |form| form.focus_prev()),
        Message::NextProtocol => edit_form(state, |form| form.next_protocol()),
        Message::PrevProtocol => edit_form(state, |form| form.prev_protocol()),
        Message::InputChar(c) => edit_form(state, |form| form.input_char(c)),
        Message::InputBackspace => edit_form(state, |form| form.backspace()),
        Message::ClearField => edit_form(state, |form| form.clear_focused()),
        Message::Submit => handle_submit(state),

        Message::Cancel => {
            if !state.in_progress() {
                return UpdateResult::none();
            }
            info!("Session cancelled by user");
            state.phase = SessionPhase::Cancelled;
            UpdateResult::action(UpdateAction::CloseSession)
        }

        // ─────────────────────────────────────────────────────────
        // Log View Messages
        // ─────────────────────────────────────────────────────────
        Message::ScrollUp => {
            state.log.view.scroll_up(1);
            UpdateResult::none()
        }
        Message::ScrollDown => {
            state.log.view.scroll_down(1);
            UpdateResult::none()
        }
        Message::ScrollToTop => {
            state.log.view.scroll_to_top();
            UpdateResult::none()
        }
        Message::ScrollToBottom => {
            state.log.view.scroll_to_bottom();
            UpdateResult::none()
        }
        Message::PageUp => {
            state.log.view.page_up();
            UpdateResult::none()
        }
        Message::PageDown => {
            state.log.view.page_down();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Quit Messages
        // ─────────────────────────────────────────────────────────
        Message::RequestQuit => {
            state.request_quit();
            close_if_quitting(state)
        }
        Message::ConfirmQuit => {
            state.confirm_quit();
            close_if_quitting(state)
        }
        Message::CancelQuit => {
            state.cancel_quit();
            UpdateResult::none()
        }
        Message::Quit => {
            state.force_quit();
            close_if_quitting(state)
        }
    }
}

/// Apply a form edit unless a session is running.
fn edit_form(state: &mut AppState, edit: impl FnOnce(&mut SettingsForm)) -> UpdateResult {
    if state.in_progress() {
        debug!("Form is locked while a session is in progress");
        return UpdateResult::none();
    }
    edit(&mut state.form);
    state.form_error = None;
    UpdateResult::none()
}

fn handle_submit(state: &mut AppState) -> UpdateResult {
    if state.in_progress() {
        debug!("Ignoring submit: session already in progress");
        return UpdateResult::none();
    }

    let config = match state.form.submit() {
        Ok(config) => config,
        Err(e) => {
            debug!("Form rejected: {}", e);
            state.form_error = Some(e.to_string());
            return UpdateResult::none();
        }
    };

    info!(
        "Submitting {} install for {}",
        config.protocol,
        config.remote()
    );
    state.form_error = None;
    state.log.clear();
    state.phase = SessionPhase::Connecting;

    UpdateResult::action(UpdateAction::StartSession {
        endpoint: state.endpoint.clone(),
        command: format_install_command(&config),
    })
}

/// Closing the app mid-session counts as a cancel.
fn close_if_quitting(state: &mut AppState) -> UpdateResult {
    if state.should_quit() && state.in_progress() {
        state.phase = SessionPhase::Cancelled;
        return UpdateResult::action(UpdateAction::CloseSession);
    }
    UpdateResult::none()
}
