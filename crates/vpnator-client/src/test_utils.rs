//! Test utilities for the session manager
//!
//! [`MockConnector`] is an in-memory [`Connector`]. Its companion
//! [`MockRemote`] plays the backend: it decides how each connect attempt
//! resolves and hands out a [`MockPeer`] for every connection it accepts.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::{sink, stream, StreamExt};
use tokio::sync::{mpsc, oneshot};

use vpnator_core::prelude::*;
use vpnator_core::Payload;

use crate::connector::{CloseInfo, Connection, Connector, Frame};

/// How the next connect attempt resolves.
enum ConnectPlan {
    Accept,
    Refuse(String),
    /// Accept once the gate fires (or its sender is dropped)
    Hold(oneshot::Receiver<()>),
}

#[derive(Default)]
struct Shared {
    plans: Mutex<VecDeque<ConnectPlan>>,
    attempts: AtomicUsize,
}

/// In-memory connector. Accepts every attempt unless told otherwise.
pub struct MockConnector {
    shared: Arc<Shared>,
    peers_tx: mpsc::UnboundedSender<MockPeer>,
}

impl MockConnector {
    /// Create a connector and the remote side that controls it.
    pub fn new() -> (Self, MockRemote) {
        let shared = Arc::new(Shared::default());
        let (peers_tx, peers_rx) = mpsc::unbounded_channel();
        (
            Self {
                shared: Arc::clone(&shared),
                peers_tx,
            },
            MockRemote { shared, peers_rx },
        )
    }
}

impl Connector for MockConnector {
    fn connect(&self, target: &str) -> impl Future<Output = Result<Connection>> + Send {
        self.shared.attempts.fetch_add(1, Ordering::SeqCst);
        let plan = self
            .shared
            .plans
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(ConnectPlan::Accept);
        let target = target.to_string();
        let peers_tx = self.peers_tx.clone();

        async move {
            match plan {
                ConnectPlan::Accept => Ok(accept(target, &peers_tx)),
                ConnectPlan::Refuse(reason) => Err(Error::connection(target, reason)),
                ConnectPlan::Hold(gate) => {
                    let _ = gate.await;
                    Ok(accept(target, &peers_tx))
                }
            }
        }
    }
}

/// Build both ends of an in-memory connection.
fn accept(target: String, peers_tx: &mpsc::UnboundedSender<MockPeer>) -> Connection {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Payload>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Result<Frame>>();

    let sink = sink::unfold(outbound_tx, |tx, payload: Payload| async move {
        tx.send(payload)
            .map_err(|_| Error::transport("mock peer hung up"))?;
        Ok::<_, Error>(tx)
    });
    let stream = stream::unfold(inbound_rx, |mut rx| async move {
        rx.recv().await.map(|frame| (frame, rx))
    });

    let _ = peers_tx.send(MockPeer {
        target,
        outbound: outbound_rx,
        inbound: inbound_tx,
    });
    Connection::new(Box::pin(sink), stream.boxed())
}

/// Backend side of the mock transport.
pub struct MockRemote {
    shared: Arc<Shared>,
    peers_rx: mpsc::UnboundedReceiver<MockPeer>,
}

impl MockRemote {
    /// Fail the next connect attempt with `reason`.
    pub fn refuse_next(&self, reason: &str) {
        self.push_plan(ConnectPlan::Refuse(reason.to_string()));
    }

    /// Stall the next connect attempt until the returned sender fires.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push_plan(ConnectPlan::Hold(rx));
        tx
    }

    /// Wait for the next accepted connection.
    pub async fn next_peer(&mut self) -> Option<MockPeer> {
        self.peers_rx.recv().await
    }

    /// Number of times `connect` was called.
    pub fn connect_attempts(&self) -> usize {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    fn push_plan(&self, plan: ConnectPlan) {
        self.shared
            .plans
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(plan);
    }
}

/// One accepted connection, seen from the backend.
///
/// Dropping the peer ends the client's inbound stream.
pub struct MockPeer {
    pub target: String,
    outbound: mpsc::UnboundedReceiver<Payload>,
    inbound: mpsc::UnboundedSender<Result<Frame>>,
}

impl MockPeer {
    pub fn send_text(&self, text: &str) {
        let _ = self
            .inbound
            .send(Ok(Frame::Message(Payload::from(text))));
    }

    /// Send a close frame.
    pub fn send_close(&self, code: u16, reason: &str) {
        let _ = self
            .inbound
            .send(Ok(Frame::Close(CloseInfo::new(Some(code), reason))));
    }

    /// Fail the client's read side.
    pub fn send_error(&self, message: &str) {
        let _ = self.inbound.send(Err(Error::transport(message)));
    }

    /// Next payload written by the client, or `None` once the client let go.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.outbound.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Payload> {
        self.outbound.try_recv().ok()
    }
}
