//! Controller Messages
//!
//! Messages sent from the controller to the surface. These are the only way
//! the conversation layer tells a UI what to show.
//!
//! # Design Philosophy
//!
//! The controller owns the transcript, the input text and the turn state.
//! Surfaces are renderers that mirror what they are told here and report
//! user intents back as [`SurfaceEvent`](crate::events::SurfaceEvent)s. This
//! keeps the conversation logic testable without a terminal.

use serde::{Deserialize, Serialize};

use crate::store::Message;

/// Identifier of an accepted submission
///
/// Allocated by the controller in increasing order, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// Messages from controller to surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerMessage {
    // ============================================
    // Transcript
    // ============================================
    /// A message was appended to the transcript
    Appended {
        /// Position of the message in the transcript
        index: usize,
        /// The message itself
        message: Message,
    },

    /// The transcript was reset
    Cleared,

    // ============================================
    // Turn lifecycle
    // ============================================
    /// Turn state changed
    State {
        /// The new state
        state: TurnState,
    },

    /// The last error changed (`None` once it is cleared)
    Error {
        /// Human-readable description of the failed query
        error: Option<String>,
    },

    /// A turn received its reply (real or synthesized)
    TurnSettled {
        /// The turn that settled
        turn_id: TurnId,
        /// Whether the service answered
        outcome: TurnOutcome,
        /// Time from acceptance to settlement
        elapsed_ms: u64,
    },

    // ============================================
    // Input & layout
    // ============================================
    /// The input field content changed
    Input {
        /// Full content of the input field
        text: String,
    },

    /// Layout bookkeeping for the surface
    Layout {
        /// What to adjust
        directive: LayoutDirective,
    },

    // ============================================
    // System
    // ============================================
    /// Show a transient notification
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Notification text
        message: String,
    },

    /// The surface should shut down
    Quit,
}

/// State of the turn lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// Ready for a submission
    #[default]
    Idle,
    /// A query is in flight
    Sending,
}

impl TurnState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Sending => "AI is thinking...",
        }
    }
}

/// How a turn settled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The service replied and its text was appended
    Success,
    /// The query failed and the apology was appended
    Failure,
}

/// Layout directives derived from conversation changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutDirective {
    /// Keep the newest message in view
    ScrollToLatest,
    /// Resize the input affordance
    InputHeight {
        /// Height in text rows, already clamped to the configured bounds
        rows: u16,
    },
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}
