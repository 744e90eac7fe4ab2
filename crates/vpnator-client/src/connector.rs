//! Transport seam between the session manager and the network.
//!
//! A [`Connector`] turns a target address into a [`Connection`]: a sink of
//! outbound [`Payload`]s and a stream of inbound [`Frame`]s. The production
//! implementation is [`WsConnector`] (tokio-tungstenite); tests plug in the
//! mock from `test_utils`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use futures_util::future;
use futures_util::stream::BoxStream;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::tungstenite::Error as WsError;

use vpnator_core::prelude::*;
use vpnator_core::Payload;

/// Outbound half of a connection.
pub type PayloadSink = Pin<Box<dyn Sink<Payload, Error = Error> + Send>>;

/// Inbound half of a connection. Ends when the transport goes away.
pub type FrameStream = BoxStream<'static, Result<Frame>>;

/// Why and how a connection ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloseInfo {
    /// Close code sent by the peer, if it sent one
    pub code: Option<u16>,
    pub reason: String,
}

impl CloseInfo {
    pub fn new(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// The connection ended without a close handshake.
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self::new(None, reason)
    }
}

impl fmt::Display for CloseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.reason.is_empty()) {
            (Some(code), false) => write!(f, "{} (code {})", self.reason, code),
            (Some(code), true) => write!(f, "closed with code {}", code),
            (None, false) => f.write_str(&self.reason),
            (None, true) => f.write_str("connection closed"),
        }
    }
}

/// One inbound item from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Message(Payload),
    /// The peer closed the connection; no more frames follow.
    Close(CloseInfo),
}

/// An established duplex connection, split into its two halves.
pub struct Connection {
    pub sink: PayloadSink,
    pub stream: FrameStream,
}

impl Connection {
    pub fn new(sink: PayloadSink, stream: FrameStream) -> Self {
        Self { sink, stream }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

/// Opens duplex connections to a target address.
pub trait Connector: Send + Sync + 'static {
    /// Establish a connection to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the handshake fails.
    fn connect(&self, target: &str) -> impl Future<Output = Result<Connection>> + Send;
}

// ---------------------------------------------------------------------------
// WebSocket connector
// ---------------------------------------------------------------------------

/// [`Connector`] for `ws://` and `wss://` targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect(&self, target: &str) -> impl Future<Output = Result<Connection>> + Send {
        let target = target.to_string();
        async move {
            let (ws_stream, _response) = connect_async(target.as_str())
                .await
                .map_err(|err| Error::connection(&target, err.to_string()))?;
            debug!("WebSocket handshake with {} complete", target);

            let (ws_sink, ws_stream) = ws_stream.split();
            let sink = ws_sink
                .sink_map_err(|err| Error::transport(err.to_string()))
                .with(|payload: Payload| future::ready(Ok::<_, Error>(payload_to_ws(payload))));
            let stream = ws_stream.filter_map(|item| future::ready(ws_to_frame(item)));

            Ok(Connection::new(Box::pin(sink), stream.boxed()))
        }
    }
}

/// Convert an outbound payload to a WebSocket message.
fn payload_to_ws(payload: Payload) -> WsMessage {
    match payload {
        Payload::Text(text) => WsMessage::Text(text.into()),
        Payload::Binary(bytes) => WsMessage::Binary(bytes.into()),
    }
}

/// Convert an inbound WebSocket item to a frame.
///
/// Ping/Pong and raw frames are handled by tungstenite and filtered out here.
fn ws_to_frame(item: std::result::Result<WsMessage, WsError>) -> Option<Result<Frame>> {
    match item {
        Ok(WsMessage::Text(text)) => Some(Ok(Frame::Message(Payload::Text(
            text.as_str().to_string(),
        )))),
        Ok(WsMessage::Binary(bytes)) => Some(Ok(Frame::Message(Payload::Binary(bytes.to_vec())))),
        Ok(WsMessage::Close(frame)) => {
            let info = match frame {
                Some(frame) => CloseInfo::new(Some(u16::from(frame.code)), frame.reason.as_str()),
                None => CloseInfo::default(),
            };
            Some(Ok(Frame::Close(info)))
        }
        Ok(_) => None,
        Err(WsError::ConnectionClosed) => None,
        Err(err) => Some(Err(Error::transport(err.to_string()))),
    }
}
