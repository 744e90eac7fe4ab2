//! vpnator-tui - Terminal UI for VPNator
//!
//! This crate provides the ratatui-based terminal interface. It drives an
//! [`vpnator_app::Engine`] and adds terminal rendering, key translation, and
//! the widgets for the settings form and the message log.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use runner::{run, run_with_engine};
