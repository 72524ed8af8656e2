//! Conversation memory port
//!
//! Per-conversation message history, keyed by exact conversation id.
//! Operations are synchronous and in-memory.

use tutor_relay_domain::Message;

/// Store of conversation histories.
///
/// Stored history never contains the system prompt; it is rendered fresh
/// each turn.
pub trait ConversationMemory: Send + Sync {
    /// Return the history for `conversation_id`, creating an empty one on
    /// first reference.
    fn get_or_create(&self, conversation_id: &str) -> Vec<Message>;

    /// Append one completed turn: the human message, then the ai reply.
    fn append(&self, conversation_id: &str, human: Message, ai: Message);

    /// Remove a conversation. Absent ids are ignored.
    fn clear(&self, conversation_id: &str);

    /// Read a conversation's history without creating it.
    fn read(&self, conversation_id: &str) -> Option<Vec<Message>>;
}
