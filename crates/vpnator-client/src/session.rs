//! Backend connection session manager.
//!
//! [`SessionManager`] owns at most one live connection at a time. Each
//! connection runs in its own background task that owns the transport and
//! reports back over a shared channel; every report is tagged with the
//! connection's id so reports from a superseded connection can be dropped
//! before they reach the caller.
//!
//! ```text
//!   open(target) ──► spawn run_connection(id) ──► Opened / Frame / Failed / Ended
//!                                                   │
//!   next_event() ◄── drop if id != active.id ◄──────┘
//! ```
//!
//! Payloads passed to [`SessionManager::send`] before the connection is open
//! wait in an [`OutboundQueue`] and are handed to the writer, in order, when
//! the `Opened` report for the current connection is processed.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};

use vpnator_core::prelude::*;
use vpnator_core::Payload;

use crate::connector::{
    CloseInfo, Connection, Connector, Frame, FrameStream, PayloadSink, WsConnector,
};
use crate::queue::OutboundQueue;

/// Identifier of one `open()` call. Monotonically increasing per manager.
pub type ConnectionId = u64;

/// Observable lifecycle of the session's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection has been opened, or the last one was closed by the caller
    #[default]
    Idle,
    /// Handshake in progress
    Connecting,
    /// Handshake complete; payloads go straight to the writer
    Open,
    /// The connection ended on its own (remote close, network error, failed handshake)
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

/// Event delivered to the owner of a [`SessionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current connection finished its handshake
    Opened,
    /// A message arrived on the current connection
    Message(Payload),
    /// The current connection hit a transport error. A `Closed` always follows.
    Error(String),
    /// The current connection ended without the caller asking for it
    Closed(CloseInfo),
}

/// Report from a connection task.
#[derive(Debug)]
struct TransportEvent {
    connection: ConnectionId,
    kind: TransportEventKind,
}

#[derive(Debug)]
enum TransportEventKind {
    Opened,
    Frame(Payload),
    Failed(String),
    Ended(CloseInfo),
}

/// Handle to the task driving the current connection.
#[derive(Debug)]
struct ActiveConnection {
    id: ConnectionId,
    target: String,
    payload_tx: mpsc::UnboundedSender<Payload>,
    close_tx: oneshot::Sender<()>,
}

impl ActiveConnection {
    /// Ask the task to close the transport. The task reports nothing afterwards
    /// that the manager will surface.
    fn shutdown(self) {
        // The task may already be gone; that is fine.
        let _ = self.close_tx.send(());
    }
}

/// Owns the single backend connection and the outbound queue.
///
/// Must be driven from inside a Tokio runtime: [`open`](Self::open) spawns the
/// connection task and [`next_event`](Self::next_event) must be polled for
/// events (including `Opened`, which flushes the queue) to be processed.
#[derive(Debug)]
pub struct SessionManager<C: Connector = WsConnector> {
    connector: Arc<C>,
    state: ConnectionState,
    queue: OutboundQueue,
    active: Option<ActiveConnection>,
    next_id: ConnectionId,
    event_tx: mpsc::UnboundedSender<TransportEvent>,
    event_rx: mpsc::UnboundedReceiver<TransportEvent>,
}

impl SessionManager<WsConnector> {
    /// Create a manager that connects over WebSocket.
    pub fn new() -> Self {
        Self::with_connector(WsConnector)
    }
}

impl Default for SessionManager<WsConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> SessionManager<C> {
    /// Create a manager with a custom transport.
    pub fn with_connector(connector: C) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            connector: Arc::new(connector),
            state: ConnectionState::Idle,
            queue: OutboundQueue::new(),
            active: None,
            next_id: 0,
            event_tx,
            event_rx,
        }
    }

    /// Start a connection to `target`.
    ///
    /// Any existing connection is closed first and nothing it reports from
    /// then on reaches [`next_event`](Self::next_event). Queued payloads are
    /// kept for the new connection.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn open(&mut self, target: impl Into<String>) {
        let target = target.into();

        if let Some(previous) = self.active.take() {
            debug!(
                "Connection #{} to {} superseded by a new open",
                previous.id, previous.target
            );
            previous.shutdown();
        }

        self.next_id += 1;
        let id = self.next_id;
        let (payload_tx, payload_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = oneshot::channel();

        info!("Opening connection #{} to {}", id, target);
        tokio::spawn(run_connection(
            id,
            target.clone(),
            Arc::clone(&self.connector),
            payload_rx,
            close_rx,
            Reporter {
                connection: id,
                tx: self.event_tx.clone(),
            },
        ));

        self.active = Some(ActiveConnection {
            id,
            target,
            payload_tx,
            close_tx,
        });
        self.state = ConnectionState::Connecting;
    }

    /// Transmit `payload`, or queue it until the connection is open.
    ///
    /// Never fails: a payload that cannot be handed to the writer right now
    /// waits in the queue.
    pub fn send(&mut self, payload: impl Into<Payload>) {
        let payload = match self.deliver(payload.into()) {
            Ok(()) => return,
            Err(payload) => payload,
        };
        trace!(
            "Queueing {} byte payload ({:?})",
            payload.len(),
            self.state
        );
        self.queue.push(payload);
    }

    /// Close the connection and discard queued payloads.
    ///
    /// Does nothing when already [`Idle`](ConnectionState::Idle). No `Closed`
    /// event is produced for a caller-initiated close.
    pub fn close(&mut self) {
        if self.state == ConnectionState::Idle {
            return;
        }

        if let Some(active) = self.active.take() {
            info!("Closing connection #{} to {}", active.id, active.target);
            active.shutdown();
        }

        let discarded = self.queue.clear();
        if discarded > 0 {
            debug!("Discarded {} queued payload(s) on close", discarded);
        }
        self.state = ConnectionState::Idle;
    }

    /// Wait for the next event from the current connection.
    ///
    /// Cancel-safe: the only await point is a channel receive, so dropping the
    /// future (e.g. in a `select!`) loses nothing. Returns `None` only if the
    /// event channel is closed, which cannot happen while `self` is alive.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            let event = self.event_rx.recv().await?;
            if let Some(session_event) = self.apply(event) {
                return Some(session_event);
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of payloads waiting for an open connection.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Target of the current connection, if any.
    pub fn target(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.target.as_str())
    }

    /// Hand `payload` to the writer if the connection is open.
    fn deliver(&self, payload: Payload) -> std::result::Result<(), Payload> {
        match (&self.active, self.state) {
            (Some(active), ConnectionState::Open) => active
                .payload_tx
                .send(payload)
                .map_err(|mpsc::error::SendError(payload)| payload),
            _ => Err(payload),
        }
    }

    /// Apply a task report to the manager state, returning the event to
    /// surface, if any.
    fn apply(&mut self, event: TransportEvent) -> Option<SessionEvent> {
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|active| active.id == event.connection);
        if !is_current {
            trace!(
                "Dropping {:?} from stale connection #{}",
                event.kind,
                event.connection
            );
            return None;
        }

        match event.kind {
            TransportEventKind::Opened => {
                self.state = ConnectionState::Open;
                self.flush_queue();
                Some(SessionEvent::Opened)
            }
            TransportEventKind::Frame(payload) => Some(SessionEvent::Message(payload)),
            TransportEventKind::Failed(reason) => Some(SessionEvent::Error(reason)),
            TransportEventKind::Ended(info) => {
                debug!("Connection #{} ended: {}", event.connection, info);
                self.active = None;
                self.state = ConnectionState::Closed;
                Some(SessionEvent::Closed(info))
            }
        }
    }

    /// Move every queued payload to the writer in submission order.
    fn flush_queue(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if self.queue.is_empty() {
            return;
        }

        let pending: Vec<Payload> = self.queue.drain().collect();
        let total = pending.len();
        let mut pending = pending.into_iter();
        while let Some(payload) = pending.next() {
            if let Err(mpsc::error::SendError(payload)) = active.payload_tx.send(payload) {
                // Writer already gone; keep the rest for the next connection.
                self.queue.push(payload);
                pending.for_each(|rest| self.queue.push(rest));
                warn!(
                    "Connection #{} stopped while flushing; {} payload(s) kept",
                    active.id,
                    self.queue.len()
                );
                return;
            }
        }
        debug!("Flushed {} queued payload(s) to connection #{}", total, active.id);
    }
}

// ---------------------------------------------------------------------------
// Connection task
// ---------------------------------------------------------------------------

/// Sending half of the report channel, bound to one connection id.
struct Reporter {
    connection: ConnectionId,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl Reporter {
    fn report(&self, kind: TransportEventKind) {
        // The manager was dropped; nobody is listening.
        let _ = self.tx.send(TransportEvent {
            connection: self.connection,
            kind,
        });
    }

    /// Report a failure followed by the end of the connection.
    fn fail(&self, reason: String) {
        self.report(TransportEventKind::Failed(reason.clone()));
        self.report(TransportEventKind::Ended(CloseInfo::abnormal(reason)));
    }
}

/// Drive one connection from handshake to close.
///
/// A close request (or the manager dropping its handle) during the handshake
/// abandons the attempt without reporting anything.
async fn run_connection<C: Connector>(
    id: ConnectionId,
    target: String,
    connector: Arc<C>,
    payload_rx: mpsc::UnboundedReceiver<Payload>,
    mut close_rx: oneshot::Receiver<()>,
    reporter: Reporter,
) {
    let connected = tokio::select! {
        result = connector.connect(&target) => result,
        _ = &mut close_rx => {
            debug!("Connection #{} closed during handshake", id);
            return;
        }
    };

    let Connection { sink, stream } = match connected {
        Ok(connection) => connection,
        Err(err) => {
            warn!("Connection #{} to {} failed: {}", id, target, err);
            reporter.fail(err.to_string());
            return;
        }
    };

    info!("Connection #{} to {} open", id, target);
    reporter.report(TransportEventKind::Opened);

    run_io_loop(id, sink, stream, payload_rx, close_rx, &reporter).await;
}

/// Pump frames in and payloads out until either side ends.
async fn run_io_loop(
    id: ConnectionId,
    mut sink: PayloadSink,
    mut stream: FrameStream,
    mut payload_rx: mpsc::UnboundedReceiver<Payload>,
    mut close_rx: oneshot::Receiver<()>,
    reporter: &Reporter,
) {
    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Frame::Message(payload))) => {
                    trace!("Connection #{} received {} bytes", id, payload.len());
                    reporter.report(TransportEventKind::Frame(payload));
                }
                Some(Ok(Frame::Close(info))) => {
                    info!("Connection #{} closed by peer: {}", id, info);
                    reporter.report(TransportEventKind::Ended(info));
                    return;
                }
                Some(Err(err)) => {
                    warn!("Connection #{} read error: {}", id, err);
                    reporter.fail(err.to_string());
                    return;
                }
                None => {
                    info!("Connection #{} stream ended", id);
                    reporter.report(TransportEventKind::Ended(CloseInfo::abnormal(
                        "connection lost",
                    )));
                    return;
                }
            },

            outbound = payload_rx.recv() => match outbound {
                Some(payload) => {
                    if let Err(err) = sink.send(payload).await {
                        warn!("Connection #{} write error: {}", id, err);
                        reporter.fail(err.to_string());
                        return;
                    }
                }
                None => {
                    close_sink(id, &mut sink).await;
                    return;
                }
            },

            _ = &mut close_rx => {
                close_sink(id, &mut sink).await;
                return;
            }
        }
    }
}

/// Best-effort close handshake. Failures are logged, never reported.
async fn close_sink(id: ConnectionId, sink: &mut PayloadSink) {
    debug!("Connection #{} closing on request", id);
    if let Err(err) = sink.close().await {
        debug!("Connection #{} close handshake failed: {}", id, err);
    }
}
