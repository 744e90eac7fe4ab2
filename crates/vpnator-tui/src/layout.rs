//! Screen layout definitions for the TUI
//!
//! Header on top, the settings form below it (its height follows the number
//! of visible form rows), the message log in the remaining space, and a
//! two-row status bar at the bottom.

use ratatui::layout::{Constraint, Layout, Rect};

const HEADER_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 2;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title and backend endpoint
    pub header: Rect,

    /// Settings form (glass container)
    pub form: Rect,

    /// Message log (glass container)
    pub logs: Rect,

    /// Phase, log position and key hints
    pub status: Rect,
}

/// Height of the form container for `form_rows` visible inputs.
///
/// One row per input, one row for the validation error, and the borders.
pub fn form_height(form_rows: usize) -> u16 {
    form_rows as u16 + 1 + 2
}

/// Create the main screen layout
///
/// # Arguments
/// * `area` - Total screen area
/// * `form_rows` - Number of visible form inputs (4, or 6 with VPN credentials)
pub fn create(area: Rect, form_rows: usize) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(form_height(form_rows)),
        Constraint::Min(3),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        form: chunks[1],
        logs: chunks[2],
        status: chunks[3],
    }
}
