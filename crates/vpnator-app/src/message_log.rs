//! Message log - received backend lines plus the scroll state of their view.

use vpnator_core::LogEntry;

/// Ordered backend lines for the current session.
///
/// Only grows while a session runs; [`clear`](Self::clear) is called when the
/// next session starts.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
    pub view: LogViewState,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.view = LogViewState::default();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LogViewState
// ─────────────────────────────────────────────────────────────────────────────

/// Vertical scroll position of the log view.
///
/// `total_lines` and `visible_lines` are set by the renderer each frame.
#[derive(Debug, Clone)]
pub struct LogViewState {
    /// Index of the first visible line
    pub offset: usize,
    /// Follow new content
    pub auto_scroll: bool,
    pub total_lines: usize,
    pub visible_lines: usize,
}

impl Default for LogViewState {
    fn default() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
            total_lines: 0,
            visible_lines: 0,
        }
    }
}

impl LogViewState {
    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_lines)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    /// Scroll down; reaching the bottom re-enables auto-scroll.
    pub fn scroll_down(&mut self, n: usize) {
        let max_offset = self.max_offset();
        self.offset = (self.offset + n).min(max_offset);
        if self.offset >= max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_scroll = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_scroll = true;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_lines.saturating_sub(2).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_lines.saturating_sub(2).max(1));
    }

    /// Record the content and viewport size from the last render.
    pub fn update_content_size(&mut self, total: usize, visible: usize) {
        self.total_lines = total;
        self.visible_lines = visible;
        if self.auto_scroll {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }
}
