//! Protocol events emitted during a chat turn.
//!
//! [`ChatEvent`] is the internal tagged representation. It is converted into
//! the flat [`StreamedChatResponse`] wire shape only at the transport boundary.

use serde::{Deserialize, Serialize};

/// One event of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A fragment of the main answer. Never terminal.
    TextChunk(String),
    /// Terminal event carrying follow-up suggestions.
    ///
    /// `None` means follow-up generation failed; the answer itself was
    /// delivered.
    FollowUps(Option<Vec<String>>),
    /// Terminal event carrying a user-safe error message.
    Failed(String),
}

impl ChatEvent {
    /// Returns true if this event ends the turn.
    pub fn is_final(&self) -> bool {
        !matches!(self, ChatEvent::TextChunk(_))
    }
}

/// Wire shape of a chat event, serialized as the `data:` payload of an SSE
/// frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamedChatResponse {
    pub text_chunk: Option<String>,
    pub follow_up_prompts: Option<Vec<String>>,
    pub is_final: bool,
}

impl From<ChatEvent> for StreamedChatResponse {
    fn from(event: ChatEvent) -> Self {
        match event {
            ChatEvent::TextChunk(text) => Self {
                text_chunk: Some(text),
                follow_up_prompts: None,
                is_final: false,
            },
            ChatEvent::FollowUps(prompts) => Self {
                text_chunk: None,
                follow_up_prompts: prompts,
                is_final: true,
            },
            ChatEvent::Failed(message) => Self {
                text_chunk: Some(message),
                follow_up_prompts: None,
                is_final: true,
            },
        }
    }
}
