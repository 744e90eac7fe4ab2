//! Message types for the application (TEA pattern)

use vpnator_client::SessionEvent;

use crate::input_key::InputKey;

/// Everything that can happen to the application.
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Event from the backend session
    Session(SessionEvent),

    // ─────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    NextProtocol,
    PrevProtocol,
    /// Type a character into the focused field
    InputChar(char),
    InputBackspace,
    /// Empty the focused field
    ClearField,
    /// Validate the form and start a session
    Submit,

    // ─────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────
    /// Abandon the running session
    Cancel,

    // ─────────────────────────────────────────────────────────
    // Log view
    // ─────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────
    // Quit
    // ─────────────────────────────────────────────────────────
    /// Quit, asking first if a session is running
    RequestQuit,
    ConfirmQuit,
    CancelQuit,
    /// Quit immediately (signals)
    Quit,
}
