//! Termination signals
//!
//! SIGINT, SIGTERM and SIGHUP all become [`Message::Quit`], so an interrupted
//! install is cancelled through the same path as quitting from the keyboard.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vpnator_core::prelude::*;

use crate::message::Message;

/// Spawn a task that sends one [`Message::Quit`] when the process is asked to stop.
///
/// The task ends after the first signal, or right away if the handlers cannot
/// be installed.
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = match wait_for_termination().await {
            Ok(name) => name,
            Err(e) => {
                error!("Signal handler error: {}", e);
                return;
            }
        };

        info!("{} received, quitting", name);
        if tx.send(Message::Quit).await.is_err() {
            debug!("Message channel closed before {} could be delivered", name);
        }
    })
}

/// Resolve with the name of the first termination signal.
#[cfg(unix)]
async fn wait_for_termination() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let listen = |kind: SignalKind, name: &str| {
        signal(kind).map_err(|e| Error::terminal(format!("cannot listen for {}: {}", name, e)))
    };
    let mut interrupt = listen(SignalKind::interrupt(), "SIGINT")?;
    let mut terminate = listen(SignalKind::terminate(), "SIGTERM")?;
    let mut hangup = listen(SignalKind::hangup(), "SIGHUP")?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = hangup.recv() => "SIGHUP",
    };
    Ok(name)
}

#[cfg(windows)]
async fn wait_for_termination() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::terminal(format!("cannot listen for Ctrl+C: {}", e)))?;
    Ok("Ctrl+C")
}
