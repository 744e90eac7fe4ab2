//! Tests for handler module

use super::*;
use crate::form::FieldId;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};
use vpnator_client::{CloseInfo, SessionEvent};
use vpnator_core::{Payload, SessionPhase, VpnProtocol};

fn filled_state(protocol: VpnProtocol) -> AppState {
    let mut state = AppState::new();
    state.form.set_protocol(protocol);
    state.form.set_value(FieldId::RemoteAddress, "1.2.3.4");
    state.form.set_value(FieldId::Username, "bob");
    state.form.set_value(FieldId::Password, "secret");
    state
}

/// Submit and return the started session's command.
fn submit(state: &mut AppState) -> String {
    match update(state, Message::Submit).action {
        Some(UpdateAction::StartSession { command, .. }) => command,
        other => panic!("expected StartSession, got {:?}", other),
    }
}

/// Run `message` and any follow-up messages it produces.
fn process(state: &mut AppState, message: Message) {
    let mut next = Some(message);
    while let Some(msg) = next {
        next = update(state, msg).message;
    }
}

fn receive(state: &mut AppState, text: &str) -> UpdateResult {
    update(
        state,
        Message::Session(SessionEvent::Message(Payload::from(text))),
    )
}

// ─────────────────────────────────────────────────────────
// Submit
// ─────────────────────────────────────────────────────────

#[test]
fn test_submit_outline_starts_session() {
    let mut state = filled_state(VpnProtocol::Outline);
    let result = update(&mut state, Message::Submit);

    assert_eq!(
        result.action,
        Some(UpdateAction::StartSession {
            endpoint: state.endpoint.clone(),
            command: "install outline 1.2.3.4 bob secret".to_string(),
        })
    );
    assert_eq!(state.phase, SessionPhase::Connecting);
    assert!(state.in_progress());
}

#[test]
fn test_submit_openconnect_appends_vpn_credentials() {
    let mut state = filled_state(VpnProtocol::OpenConnect);
    state.form.set_value(FieldId::VpnUsername, "vu");
    state.form.set_value(FieldId::VpnPassword, "vp");

    assert_eq!(
        submit(&mut state),
        "install openconnect 1.2.3.4 bob secret vu vp"
    );
}

#[test]
fn test_submit_invalid_form_reports_error() {
    let mut state = filled_state(VpnProtocol::Outline);
    state.form.set_value(FieldId::RemoteAddress, "");

    let result = update(&mut state, Message::Submit);
    assert!(result.action.is_none());
    assert_eq!(state.phase, SessionPhase::Idle);
    assert_eq!(
        state.form_error.as_deref(),
        Some("Remote address: is required")
    );

    // The next edit clears the error.
    update(&mut state, Message::FocusNext);
    assert!(state.form_error.is_none());
}

#[test]
fn test_submit_clears_previous_log() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    receive(&mut state, "old line");
    receive(&mut state, "VPNATOR-COMPLETE");
    assert_eq!(state.log.len(), 1);

    submit(&mut state);
    assert!(state.log.is_empty());
}

#[test]
fn test_submit_ignored_while_in_progress() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    let result = update(&mut state, Message::Submit);
    assert!(result.action.is_none());
}

#[test]
fn test_form_locked_while_in_progress() {
    let mut state = filled_state(VpnProtocol::Outline);
    state.form.set_focus(FieldId::Username);
    submit(&mut state);

    update(&mut state, Message::InputChar('x'));
    update(&mut state, Message::NextProtocol);
    assert_eq!(state.form.field(FieldId::Username).unwrap().value(), "bob");
    assert_eq!(state.form.protocol(), VpnProtocol::Outline);
}

// ─────────────────────────────────────────────────────────
// Session events
// ─────────────────────────────────────────────────────────

#[test]
fn test_progress_lines_append_in_order() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    assert_eq!(state.phase, SessionPhase::Installing);

    receive(&mut state, "Connecting to 1.2.3.4...");
    receive(&mut state, "Installing outline...");

    let lines: Vec<&str> = state
        .log
        .entries()
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(lines, vec!["Connecting to 1.2.3.4...", "Installing outline..."]);
}

#[test]
fn test_sentinel_completes_session_without_logging() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    receive(&mut state, "Done.");

    let result = receive(&mut state, "VPNATOR-COMPLETE");
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
    assert_eq!(state.phase, SessionPhase::Complete);
    assert!(!state.in_progress());
    assert_eq!(state.log.len(), 1);
    assert_eq!(state.log.last().unwrap().message, "Done.");
}

#[test]
fn test_sentinel_with_trailing_newline_is_progress() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));

    let result = receive(&mut state, "VPNATOR-COMPLETE\n");
    assert!(result.action.is_none());
    assert_eq!(state.phase, SessionPhase::Installing);
    assert_eq!(state.log.len(), 1);
}

#[test]
fn test_messages_after_completion_are_ignored() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    receive(&mut state, "VPNATOR-COMPLETE");

    receive(&mut state, "late line");
    assert!(state.log.is_empty());
    assert_eq!(state.phase, SessionPhase::Complete);
}

#[test]
fn test_binary_payload_logged_lossily() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    update(
        &mut state,
        Message::Session(SessionEvent::Message(Payload::Binary(b"ok \xff".to_vec()))),
    );
    assert_eq!(state.log.last().unwrap().message, "ok \u{fffd}");
}

#[test]
fn test_connection_error_fails_session() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);

    let result = update(
        &mut state,
        Message::Session(SessionEvent::Error("connection refused".into())),
    );
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
    assert_eq!(
        state.phase,
        SessionPhase::Failed {
            reason: "connection refused".into()
        }
    );

    // The Closed that follows an Error changes nothing.
    let result = update(
        &mut state,
        Message::Session(SessionEvent::Closed(CloseInfo::abnormal("refused"))),
    );
    assert!(result.action.is_none());
    assert!(matches!(state.phase, SessionPhase::Failed { ref reason } if reason == "connection refused"));
}

#[test]
fn test_remote_close_mid_session_fails() {
    let mut state = filled_state(VpnProtocol::Xray);
    submit(&mut state);
    update(&mut state, Message::Session(SessionEvent::Opened));
    receive(&mut state, "Installing xray...");

    let result = update(
        &mut state,
        Message::Session(SessionEvent::Closed(CloseInfo::new(Some(1011), "boom"))),
    );
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
    assert_eq!(state.phase.label(), "Failed");
    assert_eq!(state.log.len(), 1);
}

#[test]
fn test_events_while_idle_are_ignored() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Session(SessionEvent::Opened));
    assert!(result.action.is_none());
    assert_eq!(state.phase, SessionPhase::Idle);
}

// ─────────────────────────────────────────────────────────
// Cancel / quit
// ─────────────────────────────────────────────────────────

#[test]
fn test_cancel_closes_session() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);

    let result = update(&mut state, Message::Cancel);
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
    assert_eq!(state.phase, SessionPhase::Cancelled);
    assert!(!state.in_progress());
}

#[test]
fn test_cancel_when_idle_does_nothing() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Cancel);
    assert!(result.action.is_none());
    assert_eq!(state.phase, SessionPhase::Idle);
}

#[test]
fn test_quit_during_session_closes_it() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);

    let result = update(&mut state, Message::Quit);
    assert!(state.should_quit());
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
}

#[test]
fn test_request_quit_during_session_asks_first() {
    let mut state = filled_state(VpnProtocol::Outline);
    submit(&mut state);

    let result = update(&mut state, Message::RequestQuit);
    assert!(result.action.is_none());
    assert_eq!(state.ui_mode, UiMode::ConfirmDialog);

    let result = update(&mut state, Message::ConfirmQuit);
    assert_eq!(result.action, Some(UpdateAction::CloseSession));
    assert!(state.should_quit());
}

#[test]
fn test_start_session_debug_hides_command() {
    let action = UpdateAction::StartSession {
        endpoint: "ws://x/ws".into(),
        command: "install outline 1.2.3.4 bob secret".into(),
    };
    let debug = format!("{:?}", action);
    assert!(debug.contains("ws://x/ws"));
    assert!(!debug.contains("secret"));
}

// ─────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────

#[test]
fn test_typing_goes_to_focused_field() {
    let mut state = AppState::new();
    process(&mut state, Message::Key(InputKey::Tab));
    assert_eq!(state.form.focus(), FieldId::RemoteAddress);

    for c in "10.0.0.1".chars() {
        process(&mut state, Message::Key(InputKey::Char(c)));
    }
    process(&mut state, Message::Key(InputKey::Backspace));
    process(&mut state, Message::Key(InputKey::Char('2')));
    assert_eq!(
        state.form.field(FieldId::RemoteAddress).unwrap().value(),
        "10.0.0.2"
    );
}

#[test]
fn test_q_types_into_text_field() {
    let mut state = AppState::new();
    state.form.set_focus(FieldId::Username);
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::InputChar('q'))
    ));
}

#[test]
fn test_q_on_selector_requests_quit() {
    let state = AppState::new();
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::RequestQuit)
    ));
}

#[test]
fn test_arrows_on_selector_cycle_protocol() {
    let state = AppState::new();
    assert!(matches!(
        handle_key(&state, InputKey::Right),
        Some(Message::NextProtocol)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Left),
        Some(Message::PrevProtocol)
    ));
}

#[test]
fn test_enter_submits() {
    let state = AppState::new();
    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::Submit)
    ));
}

#[test]
fn test_esc_cancels_only_in_session() {
    let mut state = filled_state(VpnProtocol::Outline);
    assert!(handle_key(&state, InputKey::Esc).is_none());

    submit(&mut state);
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::Cancel)
    ));
    assert!(handle_key(&state, InputKey::Char('x')).is_none());
}

#[test]
fn test_ctrl_c_requests_quit() {
    let state = AppState::new();
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::RequestQuit)
    ));
}

#[test]
fn test_confirm_dialog_keys() {
    let mut state = AppState::new();
    state.ui_mode = UiMode::ConfirmDialog;
    assert!(matches!(
        handle_key(&state, InputKey::Char('y')),
        Some(Message::ConfirmQuit)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::CancelQuit)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}
