//! TUI runner - entry point and event loop
//!
//! One async loop owns the [`Engine`]: it draws, waits for the next message
//! (key, signal, or session event), and runs it through `update`.

use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::time::MissedTickBehavior;
use vpnator_app::config::Settings;
use vpnator_app::Engine;
use vpnator_client::Connector;
use vpnator_core::prelude::*;

use crate::event::InputReader;
use crate::{render, terminal};

/// Redraw at least this often so resizes show up without input.
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Run the TUI against the WebSocket backend at `endpoint`.
pub async fn run(settings: Settings, endpoint: String) -> Result<()> {
    let mut engine = Engine::new(settings, endpoint);
    run_with_engine(&mut engine).await
}

/// Run the TUI with a prepared engine. Restores the terminal on exit.
pub async fn run_with_engine<C: Connector>(engine: &mut Engine<C>) -> Result<()> {
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    engine.spawn_signal_handler();
    let input = InputReader::spawn(engine.msg_sender());

    let result = run_loop(&mut term, engine).await;

    drop(input);
    engine.shutdown();
    ratatui::restore();

    if let Err(ref e) = result {
        error!("TUI loop failed: {}", e);
    }
    result
}

/// Main event loop
async fn run_loop<B: Backend, C: Connector>(
    terminal: &mut Terminal<B>,
    engine: &mut Engine<C>,
) -> Result<()> {
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !engine.should_quit() {
        terminal
            .draw(|frame| render::view(frame, &mut engine.state))
            .map_err(|e| Error::terminal(e.to_string()))?;

        let next = tokio::select! {
            msg = engine.next_message() => Some(msg),
            _ = redraw.tick() => None,
        };

        match next {
            Some(Some(msg)) => engine.process_message(msg),
            Some(None) => {
                warn!("All message sources closed, leaving the TUI");
                return Err(Error::ChannelClosed);
            }
            None => {}
        }
    }

    Ok(())
}
