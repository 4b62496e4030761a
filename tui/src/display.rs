//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from `ControllerMessage`s and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the controller tells it
//! to. Display state is the bridge between `ControllerMessage`s and
//! rendering; it never decides anything about the conversation itself.

use std::time::Duration;

use assistant_conductor::{
    ControllerMessage, LayoutDirective, Message, NotifyLevel, TurnId, TurnOutcome, TurnState,
};

/// How long a notification stays in the status bar
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

/// A notification to display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left before it disappears
    pub remaining: Duration,
}

/// The last settled turn, for the status bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettledTurn {
    /// Which turn
    pub turn_id: TurnId,
    /// How it ended
    pub outcome: TurnOutcome,
    /// Round trip time
    pub elapsed_ms: u64,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Transcript mirror, in display order
    pub messages: Vec<Message>,
    /// Turn state
    pub turn_state: TurnState,
    /// Description of the last failed query
    pub last_error: Option<String>,
    /// Input field mirror
    pub input: String,
    /// Height of the input text area, in rows
    pub input_rows: u16,
    /// Transient notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Last turn that settled
    pub last_settled: Option<SettledTurn>,
    /// The transcript should jump to the newest message on the next frame
    pub scroll_to_latest: bool,
    /// The controller asked the surface to shut down
    pub quit: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            turn_state: TurnState::Idle,
            last_error: None,
            input: String::new(),
            input_rows: 1,
            notification: None,
            last_settled: None,
            scroll_to_latest: false,
            quit: false,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `ControllerMessage` to update display state
    pub fn apply_message(&mut self, msg: ControllerMessage) {
        match msg {
            // Transcript
            ControllerMessage::Appended { index, message } => {
                if index == self.messages.len() {
                    self.messages.push(message);
                } else {
                    tracing::warn!(
                        index,
                        mirrored = self.messages.len(),
                        "Transcript mirror out of step"
                    );
                    self.messages.truncate(index);
                    self.messages.push(message);
                }
            }
            ControllerMessage::Cleared => {
                self.messages.clear();
                self.last_settled = None;
            }

            // Turn lifecycle
            ControllerMessage::State { state } => {
                self.turn_state = state;
            }
            ControllerMessage::Error { error } => {
                self.last_error = error;
            }
            ControllerMessage::TurnSettled {
                turn_id,
                outcome,
                elapsed_ms,
            } => {
                self.last_settled = Some(SettledTurn {
                    turn_id,
                    outcome,
                    elapsed_ms,
                });
            }

            // Input & layout
            ControllerMessage::Input { text } => {
                self.input = text;
            }
            ControllerMessage::Layout { directive } => match directive {
                LayoutDirective::ScrollToLatest => self.scroll_to_latest = true,
                LayoutDirective::InputHeight { rows } => self.input_rows = rows,
            },

            // System
            ControllerMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            ControllerMessage::Quit => {
                self.quit = true;
            }
        }
    }

    /// Update timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Whether the welcome screen should be shown
    pub fn is_welcome(&self) -> bool {
        self.messages.is_empty() && self.turn_state == TurnState::Idle
    }

    /// Whether a turn is in flight
    pub fn is_sending(&self) -> bool {
        self.turn_state == TurnState::Sending
    }

    /// Take the pending scroll request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_latest)
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}
