//! Transcript Widget
//!
//! A borderless, scrollable region of pre-wrapped lines. Scrolling is
//! measured from the bottom so new messages stay in view unless the user
//! has scrolled back.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::StatefulWidget;

/// State for the transcript region
#[derive(Debug, Default)]
pub struct TranscriptState {
    /// Lines scrolled back from the newest (0 = latest in view)
    pub scroll_back: usize,
    /// Total content lines at the last render
    pub total_lines: usize,
    /// Visible rows at the last render
    pub viewport: usize,
}

impl TranscriptState {
    /// Scroll towards older content
    pub fn scroll_up(&mut self, lines: usize) {
        let max_back = self.total_lines.saturating_sub(self.viewport);
        self.scroll_back = (self.scroll_back + lines).min(max_back);
    }

    /// Scroll towards newer content
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Jump to the newest line
    pub fn scroll_to_latest(&mut self) {
        self.scroll_back = 0;
    }

    /// Whether the newest line is in view
    pub fn is_at_latest(&self) -> bool {
        self.scroll_back == 0
    }

    /// Half the visible height, at least one line
    pub fn page(&self) -> usize {
        (self.viewport / 2).max(1)
    }
}

/// A borderless, bottom-anchored list of lines
pub struct Transcript<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Transcript<'a> {
    /// Create from already wrapped lines
    pub fn new(lines: Vec<Line<'a>>) -> Self {
        Self { lines }
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let height = usize::from(area.height);
        state.total_lines = self.lines.len();
        state.viewport = height;

        // Clamp scroll
        let max_back = state.total_lines.saturating_sub(height);
        state.scroll_back = state.scroll_back.min(max_back);

        let end = state.total_lines - state.scroll_back;
        let start = end.saturating_sub(height);

        for (row, line) in (area.y..area.bottom()).zip(&self.lines[start..end]) {
            buf.set_line(area.x, row, line, area.width);
        }
    }
}
