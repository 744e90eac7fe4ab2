//! Header bar widget
//!
//! App title, backend endpoint, and the key hints for the current phase.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use vpnator_core::SessionPhase;

use crate::theme::{palette, styles};

/// Main header showing the app title, endpoint, and keybindings
pub struct MainHeader<'a> {
    endpoint: &'a str,
    phase: &'a SessionPhase,
}

impl<'a> MainHeader<'a> {
    pub fn new(endpoint: &'a str, phase: &'a SessionPhase) -> Self {
        Self { endpoint, phase }
    }

    fn shortcuts(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = if self.phase.is_in_progress() {
            &[("Esc", "Cancel"), ("↑↓", "Scroll"), ("q", "Quit")]
        } else {
            &[("Tab", "Next"), ("Enter", "Install"), ("Ctrl+C", "Quit")]
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled("[", styles::text_muted()));
            spans.push(Span::styled(key.to_string(), styles::keybinding()));
            spans.push(Span::styled(format!("] {label}"), styles::text_muted()));
        }
        Line::from(spans)
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (status_icon, _label, status_style) = styles::phase_indicator(self.phase);
        let left_line = Line::from(vec![
            Span::raw(" "),
            Span::styled(status_icon, status_style),
            Span::raw(" "),
            Span::styled(
                "VPNator",
                Style::default()
                    .fg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.endpoint.to_string(), styles::text_secondary()),
        ]);
        let left_width = left_line.width() as u16;
        buf.set_line(inner.x, inner.y, &left_line, inner.width);

        // Right-align the hints when they fit next to the title.
        let shortcuts = self.shortcuts();
        let shortcuts_width = shortcuts.width() as u16 + 1;
        if left_width + shortcuts_width + 2 <= inner.width {
            let x = inner.x + inner.width - shortcuts_width;
            buf.set_line(x, inner.y, &shortcuts, shortcuts_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_header_renders_title_and_endpoint() {
        let mut term = TestTerminal::with_size(100, 3);
        let phase = SessionPhase::Idle;
        let header = MainHeader::new("ws://127.0.0.1:8000/ws", &phase);

        term.render_widget(header, term.area());

        assert!(term.buffer_contains("VPNator"));
        assert!(term.buffer_contains("ws://127.0.0.1:8000/ws"));
        assert!(term.buffer_contains("Install"));
    }

    #[test]
    fn test_header_hints_follow_phase() {
        let mut term = TestTerminal::with_size(100, 3);
        let phase = SessionPhase::Installing;
        term.render_widget(MainHeader::new("ws://x/ws", &phase), term.area());

        assert!(term.buffer_contains("Cancel"));
        assert!(!term.buffer_contains("Install"));
    }

    #[test]
    fn test_header_drops_hints_when_narrow() {
        let mut term = TestTerminal::with_size(40, 3);
        let phase = SessionPhase::Idle;
        term.render_widget(
            MainHeader::new("wss://provisioning.example.com/ws", &phase),
            term.area(),
        );

        assert!(term.buffer_contains("VPNator"));
        assert!(!term.buffer_contains("Install"));
    }
}
