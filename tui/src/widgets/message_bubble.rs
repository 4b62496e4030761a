//! Message Bubble
//!
//! Turns one transcript entry into styled, wrapped lines: a role label with
//! an `HH:MM` timestamp, then the body indented underneath.

use ratatui::text::{Line, Span};

use assistant_conductor::{Message, TurnState};

use crate::theme;

/// Indent of the message body under its label
const BODY_INDENT: &str = "  ";

/// Label shown above user messages
pub const USER_LABEL: &str = "You";

/// Label shown above assistant messages
pub const ASSISTANT_LABEL: &str = "ML Assistant";

/// One transcript entry ready to be laid out
pub struct MessageBubble<'a> {
    message: &'a Message,
    index: usize,
}

impl<'a> MessageBubble<'a> {
    /// Wrap a message at transcript position `index`
    pub fn new(message: &'a Message, index: usize) -> Self {
        Self { message, index }
    }

    /// Lay the message out for a region `width` columns wide
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        // Spacer between messages
        if self.index > 0 {
            lines.push(Line::default());
        }

        let label = if self.message.is_user {
            USER_LABEL
        } else {
            ASSISTANT_LABEL
        };
        lines.push(Line::from(vec![
            Span::styled(label, theme::role_label(self.message.is_user)),
            Span::styled(
                format!("  {}", self.message.timestamp.format("%H:%M")),
                theme::dim(),
            ),
        ]));

        let body_width = usize::from(width)
            .saturating_sub(BODY_INDENT.len())
            .max(1);
        for raw_line in self.message.text.split('\n') {
            if raw_line.is_empty() {
                lines.push(Line::default());
                continue;
            }
            for wrapped in textwrap::wrap(raw_line, body_width) {
                lines.push(Line::styled(
                    format!("{BODY_INDENT}{wrapped}"),
                    theme::body(),
                ));
            }
        }

        lines
    }
}

/// Lines shown while a reply is on its way
///
/// `tick` advances the trailing dots.
pub fn typing_indicator(tick: u64) -> Vec<Line<'static>> {
    let dots = ".".repeat(usize::try_from(tick % 4).unwrap_or(0));
    let text = TurnState::Sending.description().trim_end_matches('.');
    vec![
        Line::default(),
        Line::from(Span::styled(ASSISTANT_LABEL, theme::role_label(false))),
        Line::styled(format!("{BODY_INDENT}{text}{dots}"), theme::dim()),
    ]
}
