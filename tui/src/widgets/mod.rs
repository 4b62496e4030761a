//! Custom Widgets
//!
//! - [`message_bubble`]: one transcript entry as styled, wrapped lines
//! - [`suggestions`]: the suggested prompts on the welcome screen
//! - [`transcript`]: a borderless region that scrolls from the bottom

pub mod message_bubble;
pub mod suggestions;
pub mod transcript;

pub use message_bubble::{typing_indicator, MessageBubble};
pub use suggestions::{SuggestionList, SuggestionState, SUGGESTIONS};
pub use transcript::{Transcript, TranscriptState};
