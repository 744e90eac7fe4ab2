//! Key event handlers for different UI modes

use crate::form::FieldId;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match state.ui_mode {
        UiMode::ConfirmDialog => handle_key_confirm_dialog(key),
        UiMode::Normal => handle_key_normal(state, key),
    }
}

fn handle_key_confirm_dialog(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y' | 'Y' | 'q') | InputKey::Enter => Some(Message::ConfirmQuit),
        InputKey::Char('n' | 'N') | InputKey::Esc => Some(Message::CancelQuit),
        // Force quit with Ctrl+C even in dialog
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_normal(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('c') => return Some(Message::RequestQuit),
        InputKey::PageUp => return Some(Message::PageUp),
        InputKey::PageDown => return Some(Message::PageDown),
        _ => {}
    }

    if state.in_progress() {
        handle_key_in_session(key)
    } else {
        handle_key_form(state, key)
    }
}

/// While a session runs the form is locked; keys drive the log and cancel.
fn handle_key_in_session(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::Cancel),
        InputKey::Char('q') => Some(Message::RequestQuit),
        InputKey::Up | InputKey::Char('k') => Some(Message::ScrollUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ScrollDown),
        InputKey::Home | InputKey::Char('g') => Some(Message::ScrollToTop),
        InputKey::End | InputKey::Char('G') => Some(Message::ScrollToBottom),
        _ => None,
    }
}

fn handle_key_form(state: &AppState, key: InputKey) -> Option<Message> {
    let on_selector = state.form.focus() == FieldId::Protocol;

    match key {
        InputKey::Tab | InputKey::Down => Some(Message::FocusNext),
        InputKey::BackTab | InputKey::Up => Some(Message::FocusPrev),
        InputKey::Enter => Some(Message::Submit),
        InputKey::Home => Some(Message::ScrollToTop),
        InputKey::End => Some(Message::ScrollToBottom),

        InputKey::Left if on_selector => Some(Message::PrevProtocol),
        InputKey::Right if on_selector => Some(Message::NextProtocol),
        InputKey::Char(' ') if on_selector => Some(Message::NextProtocol),
        InputKey::Char('q') if on_selector => Some(Message::RequestQuit),

        InputKey::Char(c) if !on_selector => Some(Message::InputChar(c)),
        InputKey::Backspace if !on_selector => Some(Message::InputBackspace),
        InputKey::CharCtrl('u') if !on_selector => Some(Message::ClearField),

        _ => None,
    }
}
