//! Status bar widget
//!
//! Displays the session phase, the failure reason, and the log scroll position.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use vpnator_app::AppState;
use vpnator_core::SessionPhase;

use crate::theme::styles;

/// Status bar widget showing session state
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn phase_indicator(&self) -> Span<'static> {
        let (icon, label, style) = styles::phase_indicator(&self.state.phase);
        Span::styled(format!("{} {}", icon, label), style)
    }

    /// Why the last session ended early, if it did.
    fn failure_reason(&self) -> Option<Span<'static>> {
        match &self.state.phase {
            SessionPhase::Failed { reason } => Some(Span::styled(reason.clone(), styles::status_red())),
            _ => None,
        }
    }

    fn scroll_indicator(&self) -> Span<'static> {
        if self.state.log.view.auto_scroll {
            Span::styled("⬇ Auto", Style::default().fg(Color::Green))
        } else {
            Span::styled("⬆ Manual", Style::default().fg(Color::Yellow))
        }
    }

    fn log_position(&self) -> String {
        let view = &self.state.log.view;
        if view.total_lines == 0 {
            "0/0".to_string()
        } else {
            let current = view.offset + 1;
            let end = (view.offset + view.visible_lines).min(view.total_lines);
            format!("{}-{}/{}", current, end, view.total_lines)
        }
    }

    fn build_segments(&self) -> Vec<Span<'static>> {
        let separator = Span::styled(" │ ", Style::default().fg(Color::DarkGray));

        let mut segments = vec![Span::raw(" "), self.phase_indicator()];

        if let Some(reason) = self.failure_reason() {
            segments.push(separator.clone());
            segments.push(reason);
        }

        segments.push(separator.clone());
        segments.push(Span::styled(
            self.state.form.protocol().label(),
            styles::text_secondary(),
        ));

        segments.push(separator);
        segments.push(self.scroll_indicator());
        segments.push(Span::raw(" "));
        segments.push(Span::styled(
            self.log_position(),
            Style::default().fg(Color::DarkGray),
        ));
        segments.push(Span::raw(" "));

        segments
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Top border doubles as a separator from the log
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Line::from(self.build_segments())).render(inner, buf);
    }
}
