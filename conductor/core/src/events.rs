//! Surface Events
//!
//! Events sent from the surface to the controller. Surfaces report what the
//! user did; the controller decides what it means and answers with
//! [`ControllerMessage`](crate::messages::ControllerMessage)s.

use serde::{Deserialize, Serialize};

/// Events from surface to controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// The input area was laid out with a new size
    Resized {
        /// Columns available for input text
        width: u16,
        /// Total surface height in rows
        height: u16,
    },

    // ============================================
    // Input editing
    // ============================================
    /// Text typed or pasted at the end of the input
    InputInserted {
        /// Inserted text (may contain newlines)
        text: String,
    },

    /// Delete the last input character
    InputBackspace,

    /// Empty the input field
    InputCleared,

    /// A suggested prompt was chosen; it fills the input without sending
    SuggestionPicked {
        /// The suggestion text
        text: String,
    },

    // ============================================
    // Conversation
    // ============================================
    /// Send the current input
    Submit,

    /// Clear the transcript
    ClearChat,

    /// User asked to exit
    QuitRequested,
}
