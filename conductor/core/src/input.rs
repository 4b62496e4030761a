//! Pending input field and its height rule
//!
//! The input field is owned by the controller so suggestion picks, submits
//! and surface edits all go through one place. Surfaces only mirror it.

use serde::{Deserialize, Serialize};

/// Text the user is composing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputField {
    text: String,
}

impl InputField {
    /// Create an empty input field
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the field holds only whitespace (or nothing)
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Append text at the end (typing, paste, newline)
    pub fn insert(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Remove the last character; returns false when already empty
    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Replace the whole content
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empty the field; returns false when it was already empty
    pub fn clear(&mut self) -> bool {
        let had_text = !self.text.is_empty();
        self.text.clear();
        had_text
    }
}

/// Height bounds for the input affordance, in text rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSizing {
    /// Never shrink below this many rows
    pub min_rows: u16,
    /// Never grow beyond this many rows
    pub max_rows: u16,
}

impl Default for InputSizing {
    fn default() -> Self {
        Self {
            min_rows: 1,
            max_rows: 5,
        }
    }
}

impl InputSizing {
    /// Rows needed to show `text` wrapped at `width` columns, clamped to bounds
    ///
    /// A width of zero means the surface has not reported its size yet, in
    /// which case only explicit line breaks are counted.
    #[must_use]
    pub fn fit(&self, text: &str, width: u16) -> u16 {
        let rows = if width == 0 {
            text.split('\n').count()
        } else {
            text.split('\n')
                .map(|line| {
                    if line.is_empty() {
                        1
                    } else {
                        textwrap::wrap(line, usize::from(width)).len().max(1)
                    }
                })
                .sum()
        };

        let rows = u16::try_from(rows).unwrap_or(u16::MAX);
        rows.clamp(self.min_rows, self.max_rows.max(self.min_rows))
    }
}
