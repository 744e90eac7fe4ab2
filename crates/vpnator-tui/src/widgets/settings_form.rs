//! Settings form widget
//!
//! One row per visible input: the protocol selector, then the text inputs.
//! The last row shows the validation error, if any.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use vpnator_app::{FieldId, SettingsForm};
use vpnator_core::VpnProtocol;

use crate::theme::styles;

const LABEL_WIDTH: usize = 16;
const CURSOR: &str = "▏";

pub struct SettingsFormView<'a> {
    form: &'a SettingsForm,
    locked: bool,
    error: Option<&'a str>,
}

impl<'a> SettingsFormView<'a> {
    pub fn new(form: &'a SettingsForm) -> Self {
        Self {
            form,
            locked: false,
            error: None,
        }
    }

    /// Render without focus highlight while a session is running.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    fn row(&self, field: FieldId) -> Line<'static> {
        let focused = !self.locked && self.form.focus() == field;
        let label_style = if focused {
            styles::focused_selected()
        } else {
            styles::text_secondary()
        };

        let mut spans = vec![
            Span::styled(
                format!(" {:<width$}", field.label(), width = LABEL_WIDTH - 1),
                label_style,
            ),
            Span::raw(" "),
        ];

        if field == FieldId::Protocol {
            spans.extend(self.protocol_spans(focused));
        } else {
            spans.extend(self.text_spans(field, focused));
        }
        Line::from(spans)
    }

    fn protocol_spans(&self, focused: bool) -> Vec<Span<'static>> {
        let selected = self.form.protocol();
        let mut spans = Vec::new();
        if focused {
            spans.push(Span::styled("◀ ", styles::accent()));
        }
        for (i, protocol) in VpnProtocol::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if *protocol == selected {
                styles::accent_bold()
            } else {
                styles::text_muted()
            };
            spans.push(Span::styled(protocol.label(), style));
        }
        if focused {
            spans.push(Span::styled(" ▶", styles::accent()));
        }
        spans
    }

    fn text_spans(&self, field: FieldId, focused: bool) -> Vec<Span<'static>> {
        let input = match self.form.field(field) {
            Some(input) => input,
            None => return Vec::new(),
        };

        let mut spans = Vec::new();
        if input.is_empty() && !focused {
            spans.push(Span::styled(field.placeholder(), styles::text_muted()));
        } else {
            spans.push(Span::styled(
                input.display(field.is_secret()),
                styles::text_primary(),
            ));
        }
        if focused {
            spans.push(Span::styled(CURSOR, styles::accent()));
        }
        spans
    }

    fn footer(&self) -> Line<'static> {
        match (self.error, self.locked) {
            (Some(error), _) => Line::from(Span::styled(format!(" ✗ {error}"), styles::status_red())),
            (None, true) => Line::from(Span::styled(
                " Form locked while a session is in progress",
                styles::text_muted(),
            )),
            (None, false) => Line::default(),
        }
    }
}

impl Widget for SettingsFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(!self.locked).title(Span::styled(
            format!(" {} Server ", self.form.protocol().label()),
            Style::default(),
        ));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut y = inner.y;
        let bottom = inner.y + inner.height;
        for field in self.form.visible_fields() {
            if y >= bottom {
                return;
            }
            buf.set_line(inner.x, y, &self.row(field), inner.width);
            y += 1;
        }

        if y < bottom {
            buf.set_line(inner.x, y, &self.footer(), inner.width);
        }
    }
}
