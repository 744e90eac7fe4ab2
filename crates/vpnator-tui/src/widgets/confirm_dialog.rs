//! Quit confirmation dialog

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::modal_overlay;
use crate::theme::styles;

const DIALOG_WIDTH: u16 = 48;
const DIALOG_HEIGHT: u16 = 7;

/// Modal asking whether to quit while a session is running.
///
/// Renders over the whole `area`: dims it, then draws the dialog centered.
pub struct ConfirmDialog<'a> {
    message: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        modal_overlay::dim_background(buf, area);

        let dialog = modal_overlay::centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        modal_overlay::clear_area(buf, dialog);
        modal_overlay::render_shadow(buf, dialog);

        let block = styles::modal_block(" Quit ");
        let inner = block.inner(dialog);
        block.render(dialog, buf);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(self.message, styles::text_primary())),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", styles::keybinding()),
                Span::styled(" Quit    ", styles::text_secondary()),
                Span::styled("[n]", styles::keybinding()),
                Span::styled(" Stay", styles::text_secondary()),
            ]),
        ];
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
