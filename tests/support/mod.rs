//! Local WebSocket backend for integration tests
//!
//! Accepts one connection, records the install command it receives, then
//! replies with a scripted sequence of frames.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// What the backend does after it reads the install command.
#[derive(Debug, Clone)]
pub enum Reply {
    Line(&'static str),
    Close(&'static str),
}

pub struct MockBackend {
    pub url: String,
    command: Option<oneshot::Receiver<String>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Bind on an ephemeral port and serve one scripted session.
    pub async fn start(script: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let (command_tx, command_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

            let command = loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => break text.as_str().to_string(),
                    Some(Ok(_)) => continue,
                    _ => return,
                }
            };
            let _ = command_tx.send(command);

            for reply in script {
                let sent = match reply {
                    Reply::Line(line) => ws.send(Message::Text(line.into())).await,
                    Reply::Close(reason) => {
                        ws.close(Some(CloseFrame {
                            code: CloseCode::Away,
                            reason: reason.into(),
                        }))
                        .await
                    }
                };
                if sent.is_err() {
                    return;
                }
            }

            // Keep reading until the client hangs up.
            while let Some(Ok(_)) = ws.next().await {}
        });

        Self {
            url,
            command: Some(command_rx),
            handle,
        }
    }

    /// The install command line the client sent.
    pub async fn command(&mut self) -> String {
        self.command
            .take()
            .expect("command already taken")
            .await
            .expect("backend saw no command")
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}/ws", addr)
}
