//! VPNator
//!
//! Provision VPN servers from the terminal. The form, the session shell, and
//! the backend connection live in the workspace crates; this crate adds the
//! entry points for the TUI and for headless NDJSON mode.

pub mod headless;

use vpnator_app::config::Settings;
use vpnator_core::prelude::*;

pub use headless::runner::{run_headless, HeadlessOutcome, HeadlessRequest};
pub use headless::HeadlessEvent;

/// Run the interactive TUI.
pub async fn run_tui(settings: Settings, endpoint: String) -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    info!("Starting TUI against {}", endpoint);

    vpnator_tui::run(settings, endpoint)
        .await
        .context("TUI exited with an error")?;

    info!("VPNator exiting");
    Ok(())
}
