//! Theme and Colors
//!
//! The assistant's palette: blue for the user, purple for the assistant,
//! a blue-to-purple accent for chrome.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Role Colors
// ============================================================================

/// User messages - bright blue
pub const USER_BLUE: Color = Color::Rgb(96, 165, 250);

/// Assistant messages - soft purple
pub const ASSISTANT_PURPLE: Color = Color::Rgb(192, 132, 252);

/// Message body text
pub const BODY_TEXT: Color = Color::Rgb(229, 231, 235);

// ============================================================================
// UI Colors
// ============================================================================

/// Title accent
pub const ACCENT: Color = Color::Rgb(129, 140, 248);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(107, 114, 128);

/// Border lines
pub const BORDER_GRAY: Color = Color::Rgb(75, 85, 99);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(239, 68, 68);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(245, 158, 11);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(34, 197, 94);

/// Highlighted suggestion background
pub const SELECTION_BG: Color = Color::Rgb(49, 46, 129);

// ============================================================================
// Styles
// ============================================================================

/// Title text in the header
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Secondary text (hints, timestamps)
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Role label for a message
pub fn role_label(is_user: bool) -> Style {
    let color = if is_user { USER_BLUE } else { ASSISTANT_PURPLE };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Message body
pub fn body() -> Style {
    Style::default().fg(BODY_TEXT)
}
