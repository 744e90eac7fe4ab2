//! Message log widget
//!
//! Shows the backend's progress lines for the current session, oldest first,
//! with a scrollbar once they overflow the viewport.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use vpnator_app::LogViewState;
use vpnator_core::{LogEntry, SessionPhase};

use crate::theme::{palette, styles};

pub struct MessageLogView<'a> {
    entries: &'a [LogEntry],
    phase: &'a SessionPhase,
}

impl<'a> MessageLogView<'a> {
    pub fn new(entries: &'a [LogEntry], phase: &'a SessionPhase) -> Self {
        Self { entries, phase }
    }

    /// Centered hint shown before the backend has said anything.
    fn empty_hint(&self) -> (&'static str, &'static str) {
        match self.phase {
            SessionPhase::Idle => ("No session yet", "Fill in the form and press Enter"),
            SessionPhase::Connecting => ("Connecting", "Waiting for the backend"),
            SessionPhase::Installing => ("Connected", "Waiting for progress"),
            SessionPhase::Complete => ("Complete", "The backend sent no progress lines"),
            SessionPhase::Failed { .. } => ("Failed", "See the status bar for the reason"),
            SessionPhase::Cancelled => ("Cancelled", "Press Enter to try again"),
        }
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        let (title, hint) = self.empty_hint();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(palette::TEXT_MUTED)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, styles::text_muted())),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    /// Screen rows for one entry. Backend chunks can span several lines;
    /// only the first row carries the timestamp.
    fn entry_rows(entry: &LogEntry) -> Vec<Line<'_>> {
        let time = format!(" {} ", entry.formatted_time());
        let indent = " ".repeat(time.chars().count());
        let message_style = Style::default().fg(palette::LOG_MESSAGE);

        let mut parts: Vec<&str> = entry.message.lines().collect();
        if parts.is_empty() {
            parts.push("");
        }

        parts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let gutter = if i == 0 {
                    Span::styled(time.clone(), Style::default().fg(palette::LOG_TIMESTAMP))
                } else {
                    Span::raw(indent.clone())
                };
                Line::from(vec![gutter, Span::styled(text, message_style)])
            })
            .collect()
    }
}

impl StatefulWidget for MessageLogView<'_> {
    type State = LogViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let title = format!(" Progress ({}) ", self.entries.len());
        let block = styles::glass_block(false).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            state.update_content_size(0, inner.height as usize);
            self.render_empty(inner, buf);
            return;
        }

        let rows: Vec<Line> = self.entries.iter().flat_map(Self::entry_rows).collect();
        let total_lines = rows.len();
        let visible_lines = inner.height as usize;
        state.update_content_size(total_lines, visible_lines);

        let lines: Vec<Line> = rows
            .into_iter()
            .skip(state.offset)
            .take(visible_lines)
            .collect();
        Paragraph::new(lines).render(inner, buf);

        if total_lines > visible_lines {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");
            let mut scrollbar_state = ScrollbarState::new(total_lines).position(state.offset);
            scrollbar.render(area, buf, &mut scrollbar_state);
        }
    }
}
