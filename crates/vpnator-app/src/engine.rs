//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the backend [`SessionManager`], and the
//! message channel. Runners feed it messages (keys, signals) and session
//! events through [`Engine::next_message`] and [`Engine::process_message`];
//! the Engine executes the resulting [`UpdateAction`]s.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};
use vpnator_client::{Connector, SessionManager, WsConnector};
use vpnator_core::SessionPhase;

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::signals;
use crate::state::AppState;

/// Lightweight snapshot of state for change detection.
#[derive(Debug, Clone)]
struct StateSnapshot {
    phase: SessionPhase,
    last_log_id: Option<u64>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            phase: state.phase.clone(),
            last_log_id: state.log.last().map(|entry| entry.id),
        }
    }
}

/// Orchestration engine for VPNator.
pub struct Engine<C: Connector = WsConnector> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// The single backend connection
    pub session: SessionManager<C>,

    /// Sender half of the message channel. Clone for input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine<WsConnector> {
    /// Create an Engine that talks to the backend over WebSocket.
    pub fn new(settings: Settings, endpoint: String) -> Self {
        Self::with_connector(WsConnector, settings, endpoint)
    }
}

impl<C: Connector> Engine<C> {
    pub fn with_connector(connector: C, settings: Settings, endpoint: String) -> Self {
        let state = AppState::with_settings(settings, endpoint);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            session: SessionManager::with_connector(connector),
            msg_tx,
            msg_rx,
            event_tx,
        }
    }

    /// Send `Message::Quit` on SIGINT/SIGTERM. Needs a Tokio runtime.
    pub fn spawn_signal_handler(&self) {
        signals::spawn_signal_handler(self.msg_tx.clone());
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Wait for the next message from either the channel or the session.
    ///
    /// Cancel-safe; returns `None` only if both sources are gone.
    pub async fn next_message(&mut self) -> Option<Message> {
        tokio::select! {
            event = self.session.next_event() => event.map(Message::Session),
            msg = self.msg_rx.recv() => msg,
        }
    }

    /// Run one message and its follow-ups through update, executing actions.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let mut next = Some(msg);
        while let Some(msg) = next {
            let result = handler::update(&mut self.state, msg);
            if let Some(action) = result.action {
                self.handle_action(action);
            }
            next = result.message;
        }

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Close the backend connection and notify subscribers.
    pub fn shutdown(&mut self) {
        info!("Engine shutting down");
        self.session.close();
        self.emit(EngineEvent::Shutdown);
    }

    fn handle_action(&mut self, action: UpdateAction) {
        debug!("Executing {:?}", action);
        match action {
            UpdateAction::StartSession { endpoint, command } => {
                self.session.open(endpoint);
                self.session.send(command);
            }
            UpdateAction::CloseSession => self.session.close(),
        }
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.phase != post.phase {
            self.emit(EngineEvent::PhaseChanged {
                old_phase: pre.phase.clone(),
                new_phase: post.phase.clone(),
            });
        }

        if pre.last_log_id != post.last_log_id {
            let fresh = self
                .state
                .log
                .entries()
                .iter()
                .filter(|entry| pre.last_log_id.map_or(true, |last| entry.id > last));
            for entry in fresh {
                self.emit(EngineEvent::LogAppended {
                    entry: entry.clone(),
                });
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}
