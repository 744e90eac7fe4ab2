//! Main render/view function (View in TEA pattern)

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use vpnator_app::{AppState, UiMode};

use crate::theme::palette;
use crate::{layout, widgets};

const QUIT_PROMPT: &str = "A session is in progress. Quit and cancel it?";

/// Render the complete UI (View function in TEA)
///
/// Only the log view state is written back (content size and offset).
pub fn view(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area, state.form.visible_fields().len());

    frame.render_widget(
        widgets::MainHeader::new(&state.endpoint, &state.phase),
        areas.header,
    );

    let form = widgets::SettingsFormView::new(&state.form)
        .locked(state.in_progress())
        .error(state.form_error.as_deref());
    frame.render_widget(form, areas.form);

    // The widget borrows the entries, so scroll state goes through a copy.
    let mut log_view_state = state.log.view.clone();
    let log_view = widgets::MessageLogView::new(state.log.entries(), &state.phase);
    frame.render_stateful_widget(log_view, areas.logs, &mut log_view_state);
    state.log.view = log_view_state;

    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    if state.ui_mode == UiMode::ConfirmDialog {
        frame.render_widget(widgets::ConfirmDialog::new(QUIT_PROMPT), area);
    }
}
