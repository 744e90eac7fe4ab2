//! Headless mode runner - one install request, no TUI
//!
//! Fills the settings form from the request, submits it, and forwards the
//! engine's events as [`HeadlessEvent`]s until the session settles.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use vpnator_app::config::Settings;
use vpnator_app::{AppState, Engine, EngineEvent, FieldId, Message};
use vpnator_client::Connector;
use vpnator_core::prelude::*;
use vpnator_core::{SessionPhase, VpnProtocol};

use super::HeadlessEvent;

/// Values for one headless install, as given on the command line.
#[derive(Clone, Default)]
pub struct HeadlessRequest {
    /// Falls back to the configured default protocol
    pub protocol: Option<VpnProtocol>,
    pub address: String,
    pub username: String,
    pub password: String,
    pub vpn_username: Option<String>,
    pub vpn_password: Option<String>,
}

impl std::fmt::Debug for HeadlessRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessRequest")
            .field("protocol", &self.protocol)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("vpn_username", &self.vpn_username)
            .finish_non_exhaustive()
    }
}

/// How a headless run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessOutcome {
    /// The backend sent the completion sentinel
    Complete,
    /// The form rejected the request; nothing was sent
    Rejected(String),
    /// The connection failed or closed before completion
    Failed(String),
    /// Interrupted by a signal
    Cancelled,
}

impl HeadlessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, HeadlessOutcome::Complete)
    }
}

/// Run in headless mode against the WebSocket backend, printing NDJSON.
pub async fn run_headless(
    settings: Settings,
    endpoint: String,
    request: HeadlessRequest,
) -> Result<HeadlessOutcome> {
    info!("Starting headless session against {}", endpoint);

    let mut engine = Engine::new(settings, endpoint);
    engine.spawn_signal_handler();

    let outcome = run_session(&mut engine, &request, |event| event.emit()).await;

    info!("VPNator headless mode exiting: {:?}", outcome);
    Ok(outcome)
}

/// Submit `request` and drive the engine until the session settles.
///
/// Every event is handed to `emit` in order.
pub async fn run_session<C, F>(
    engine: &mut Engine<C>,
    request: &HeadlessRequest,
    mut emit: F,
) -> HeadlessOutcome
where
    C: Connector,
    F: FnMut(HeadlessEvent),
{
    let mut events = engine.subscribe();

    fill_form(&mut engine.state, request);
    engine.process_message(Message::Submit);

    if let Some(reason) = engine.state.form_error.clone() {
        warn!("Headless request rejected: {}", reason);
        emit(HeadlessEvent::error(reason.clone(), true));
        engine.shutdown();
        return HeadlessOutcome::Rejected(reason);
    }

    forward_events(&mut events, &engine.state, &mut emit);

    while engine.state.in_progress() && !engine.should_quit() {
        match engine.next_message().await {
            Some(msg) => engine.process_message(msg),
            None => {
                warn!("Message sources closed mid-session");
                break;
            }
        }
        forward_events(&mut events, &engine.state, &mut emit);
    }

    engine.shutdown();

    match &engine.state.phase {
        SessionPhase::Complete => HeadlessOutcome::Complete,
        SessionPhase::Failed { reason } => HeadlessOutcome::Failed(reason.clone()),
        SessionPhase::Cancelled => HeadlessOutcome::Cancelled,
        other => HeadlessOutcome::Failed(format!("session stopped while {}", other.label())),
    }
}

fn fill_form(state: &mut AppState, request: &HeadlessRequest) {
    let form = &mut state.form;
    if let Some(protocol) = request.protocol {
        form.set_protocol(protocol);
    }
    form.set_value(FieldId::RemoteAddress, request.address.as_str());
    form.set_value(FieldId::Username, request.username.as_str());
    form.set_value(FieldId::Password, request.password.as_str());
    if let Some(ref vpn_username) = request.vpn_username {
        form.set_value(FieldId::VpnUsername, vpn_username.as_str());
    }
    if let Some(ref vpn_password) = request.vpn_password {
        form.set_value(FieldId::VpnPassword, vpn_password.as_str());
    }
}

/// Drain pending engine events and translate them.
fn forward_events<F: FnMut(HeadlessEvent)>(
    events: &mut broadcast::Receiver<EngineEvent>,
    state: &AppState,
    emit: &mut F,
) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                for headless in translate(event, state) {
                    emit(headless);
                }
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Headless output skipped {} engine events", skipped);
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn translate(event: EngineEvent, state: &AppState) -> Vec<HeadlessEvent> {
    match event {
        EngineEvent::PhaseChanged { new_phase, .. } => match new_phase {
            SessionPhase::Connecting => {
                let remote = state
                    .form
                    .field(FieldId::RemoteAddress)
                    .map(|field| vpnator_core::RemoteAddress::parse(field.value()).to_string())
                    .unwrap_or_default();
                vec![HeadlessEvent::submitted(
                    state.form.protocol().as_str(),
                    &remote,
                    &state.endpoint,
                )]
            }
            SessionPhase::Installing => vec![HeadlessEvent::connected(&state.endpoint)],
            SessionPhase::Complete => vec![HeadlessEvent::complete()],
            SessionPhase::Failed { reason } => vec![
                HeadlessEvent::error(reason.clone(), false),
                HeadlessEvent::disconnected(Some(reason)),
            ],
            SessionPhase::Cancelled => {
                vec![HeadlessEvent::disconnected(Some("cancelled".to_string()))]
            }
            SessionPhase::Idle => Vec::new(),
        },
        EngineEvent::LogAppended { entry } => vec![HeadlessEvent::message(entry.message)],
        EngineEvent::Shutdown => Vec::new(),
    }
}
