//! Suggested Prompts
//!
//! The welcome screen offers a handful of starter questions. Picking one
//! only fills the input; the user still has to submit it.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;

use crate::theme;

/// Starter questions shown on the welcome screen
pub const SUGGESTIONS: [&str; 6] = [
    "Explain the difference between supervised and unsupervised learning",
    "What is gradient descent?",
    "How does a neural network work?",
    "What are the types of machine learning algorithms?",
    "Explain overfitting and how to prevent it",
    "What is cross-validation?",
];

/// Visibility and keyboard selection of the suggestion list
#[derive(Debug, Clone)]
pub struct SuggestionState {
    /// Whether the list is shown
    pub visible: bool,
    /// Highlighted entry
    pub selected: usize,
}

impl Default for SuggestionState {
    fn default() -> Self {
        Self {
            visible: true,
            selected: 0,
        }
    }
}

impl SuggestionState {
    /// Move the highlight down, wrapping around
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % SUGGESTIONS.len();
    }

    /// Move the highlight up, wrapping around
    pub fn select_previous(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(SUGGESTIONS.len() - 1);
    }

    /// The highlighted suggestion, if the list is shown
    pub fn selected_text(&self) -> Option<&'static str> {
        if self.visible {
            SUGGESTIONS.get(self.selected).copied()
        } else {
            None
        }
    }
}

/// Renders [`SUGGESTIONS`] as a selectable list
#[derive(Default)]
pub struct SuggestionList;

impl StatefulWidget for SuggestionList {
    type State = SuggestionState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if !state.visible || area.height == 0 {
            return;
        }

        buf.set_line(
            area.x,
            area.y,
            &Line::styled("Try asking (Up/Down to choose, Tab to use):", theme::dim()),
            area.width,
        );

        let width = usize::from(area.width.saturating_sub(4));
        for (i, (row, text)) in (area.y + 1..area.bottom()).zip(SUGGESTIONS).enumerate() {
            let is_selected = i == state.selected;
            let marker = if is_selected { "> " } else { "  " };
            let style = if is_selected {
                Style::default().fg(theme::BODY_TEXT).bg(theme::SELECTION_BG)
            } else {
                theme::body()
            };
            let shown: String = text.chars().take(width).collect();
            buf.set_line(
                area.x,
                row,
                &Line::from(vec![
                    Span::styled(marker, theme::title()),
                    Span::styled(shown, style),
                ]),
                area.width,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut state = SuggestionState::default();
        state.select_previous();
        assert_eq!(state.selected, SUGGESTIONS.len() - 1);
        state.select_next();
        assert_eq!(state.selected, 0);
        state.select_next();
        assert_eq!(state.selected_text(), Some("What is gradient descent?"));
    }

    #[test]
    fn test_hidden_list_has_no_selection() {
        let state = SuggestionState {
            visible: false,
            selected: 2,
        };
        assert_eq!(state.selected_text(), None);
    }

    #[test]
    fn test_render_marks_selection() {
        let area = Rect::new(0, 0, 80, 8);
        let mut buf = Buffer::empty(area);
        let mut state = SuggestionState {
            visible: true,
            selected: 5,
        };

        SuggestionList.render(area, &mut buf, &mut state);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 6)].symbol().to_string())
            .collect();
        assert!(row.starts_with("> What is cross-validation?"));
    }
}
