//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use vpnator_core::{LogEntry, SessionPhase};

/// Domain events emitted by the Engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The session phase changed
    PhaseChanged {
        old_phase: SessionPhase,
        new_phase: SessionPhase,
    },

    /// A backend line was added to the message log
    LogAppended { entry: LogEntry },

    /// The engine is shutting down
    Shutdown,
}
