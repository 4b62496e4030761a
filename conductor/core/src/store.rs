//! Conversation Store
//!
//! Holds the ordered transcript and the transient flags that describe the
//! conversation: whether a turn is in flight and the last query failure.
//!
//! # Design Philosophy
//!
//! The store is the single source of truth consumed by the controller and by
//! every surface. It performs no I/O and no validation beyond keeping the
//! transcript append-only; the only way to remove entries is a full reset.
//! Each reset advances the [`Epoch`] so completions issued before the reset
//! can be recognised and dropped.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single transcript entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message content
    pub text: String,
    /// Whether the user wrote this message (false = assistant)
    pub is_user: bool,
    /// When the message was created
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// Create a user message stamped with the current time
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            timestamp: Local::now(),
        }
    }

    /// Create an assistant message stamped with the current time
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            timestamp: Local::now(),
        }
    }
}

/// Reset generation of a conversation
///
/// Starts at zero and advances on every [`ConversationStore::clear`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory conversation state
#[derive(Clone, Debug, Default)]
pub struct ConversationStore {
    /// Transcript in display order
    messages: Vec<Message>,
    /// A turn is waiting for its reply
    pending: bool,
    /// Description of the last failed query
    last_error: Option<String>,
    /// Current reset generation
    epoch: Epoch,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the end of the transcript
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Reset to the empty state and advance the epoch
    ///
    /// Outstanding requests are not cancelled; their completions carry the
    /// previous epoch and must be discarded by the caller.
    pub fn clear(&mut self) {
        let dropped = self.messages.len();
        self.messages.clear();
        self.pending = false;
        self.last_error = None;
        self.epoch = self.epoch.next();

        tracing::debug!(dropped, epoch = %self.epoch, "Cleared conversation");
    }

    /// Set the in-flight flag
    pub fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    /// Set or clear the last error
    pub fn set_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }

    /// All messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The newest message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages in the transcript
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a turn is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Description of the last failed query, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current reset generation
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}
