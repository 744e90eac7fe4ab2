//! Rendering helpers for widget tests.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{StatefulWidget, Widget};
use ratatui::Terminal;

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// A `TestBackend` terminal with text assertions over the rendered buffer.
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.buffer().area;
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("draw widget");
    }

    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        area: Rect,
        state: &mut W::State,
    ) {
        self.terminal
            .draw(|frame| frame.render_stateful_widget(widget, area, state))
            .expect("draw stateful widget");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Whole buffer as a single string, rows concatenated.
    pub fn content(&self) -> String {
        self.buffer().content.iter().map(|c| c.symbol()).collect()
    }

    /// Text of one row.
    pub fn line(&self, y: u16) -> String {
        let buf = self.buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        let buf = self.buffer();
        (0..buf.area.height).any(|y| self.line(y).contains(text))
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}
