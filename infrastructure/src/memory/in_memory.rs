//! Process-local conversation store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;
use tutor_relay_application::ConversationMemory;
use tutor_relay_domain::Message;

/// In-memory implementation of [`ConversationMemory`].
///
/// Histories live for the lifetime of the process. With `max_turns` set,
/// the oldest turns are dropped once a conversation exceeds that many
/// human/ai pairs.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<String, Vec<Message>>>,
    max_turns: Option<usize>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_turns` turns per conversation (None = unbounded).
    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Number of conversations currently held.
    pub fn len(&self) -> usize {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConversationMemory for InMemoryConversationStore {
    fn get_or_create(&self, conversation_id: &str) -> Vec<Message> {
        if let Some(history) = self
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
        {
            return history.clone();
        }

        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                debug!(conversation_id, "Created conversation");
                Vec::new()
            })
            .clone()
    }

    fn append(&self, conversation_id: &str, human: Message, ai: Message) {
        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let history = conversations.entry(conversation_id.to_string()).or_default();
        history.push(human);
        history.push(ai);

        if let Some(max_turns) = self.max_turns {
            let max_messages = max_turns.saturating_mul(2);
            if history.len() > max_messages {
                let excess = history.len() - max_messages;
                history.drain(..excess);
                debug!(conversation_id, dropped = excess, "Trimmed conversation history");
            }
        }
    }

    fn clear(&self, conversation_id: &str) {
        let removed = self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(conversation_id);
        if removed.is_some() {
            debug!(conversation_id, "Deleted conversation");
        }
    }

    fn read(&self, conversation_id: &str) -> Option<Vec<Message>> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(conversation_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_or_create_starts_empty() {
        let store = InMemoryConversationStore::new();
        assert_eq!(store.read("c1"), None);
        assert!(store.get_or_create("c1").is_empty());
        assert_eq!(store.read("c1"), Some(vec![]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let store = InMemoryConversationStore::new();
        store.append("c1", Message::human("q1"), Message::ai("a1"));
        store.append("c1", Message::human("q2"), Message::ai("a2"));

        let contents: Vec<String> = store
            .read("c1")
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
    }

    #[test]
    fn test_ids_are_exact_keys() {
        let store = InMemoryConversationStore::new();
        store.append("Conv", Message::human("q"), Message::ai("a"));
        assert_eq!(store.read("conv"), None);
        assert_eq!(store.read("Conv ").as_deref(), None);
        assert!(store.read("Conv").is_some());
    }

    #[test]
    fn test_clear_removes_and_ignores_unknown() {
        let store = InMemoryConversationStore::new();
        store.append("c1", Message::human("q"), Message::ai("a"));
        store.clear("c1");
        store.clear("nonexistent");
        assert_eq!(store.read("c1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_max_turns_drops_oldest_pairs() {
        let store = InMemoryConversationStore::new().with_max_turns(Some(2));
        for i in 1..=3 {
            store.append(
                "c1",
                Message::human(format!("q{}", i)),
                Message::ai(format!("a{}", i)),
            );
        }
        let history = store.read("c1").unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], Message::human("q2"));
        assert_eq!(history[3], Message::ai("a3"));
    }

    #[test]
    fn test_concurrent_appends_to_distinct_conversations() {
        let store = Arc::new(InMemoryConversationStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let id = format!("c{}", i);
                    for _ in 0..10 {
                        store.append(&id, Message::human("q"), Message::ai("a"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8);
        assert_eq!(store.read("c3").unwrap().len(), 20);
    }
}
