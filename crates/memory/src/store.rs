//! In-memory conversation store.
//!
//! A process-wide map from conversation key to its message history. Nothing
//! survives a restart.
//!
//! Each conversation sits behind its own async mutex, so an exchange can hold
//! its conversation locked across the backend call while other conversations
//! proceed untouched. The outer map lock is a plain `std::sync::Mutex` held
//! only long enough to look up, insert, or remove a slot.

use chatrelay_core::message::{ConversationId, Message};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Maximum number of messages retained per conversation.
///
/// Older messages are dropped first once the cap is exceeded.
pub const MAX_HISTORY: usize = 20;

#[derive(Default)]
struct Slot {
    messages: Vec<Message>,
    /// Set once the slot has been removed from the map. A task that was
    /// queued on the lock must not write into a retired slot.
    retired: bool,
}

type SharedSlot = Arc<AsyncMutex<Slot>>;

/// Process-wide conversation history, keyed by conversation id.
#[derive(Default)]
pub struct ConversationStore {
    conversations: Mutex<HashMap<ConversationId, SharedSlot>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &ConversationId) -> Option<SharedSlot> {
        let conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        conversations.get(id).cloned()
    }

    fn slot_or_create(&self, id: &ConversationId) -> SharedSlot {
        let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        conversations
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(conversation_id = %id, "Creating conversation");
                Arc::new(AsyncMutex::new(Slot::default()))
            })
            .clone()
    }

    /// Lock a conversation for a read-modify-write exchange, creating it if unseen.
    ///
    /// Waits for any other exchange on the same key to finish first.
    pub async fn lock(&self, id: &ConversationId) -> ConversationGuard {
        loop {
            let guard = self.slot_or_create(id).lock_owned().await;
            if !guard.retired {
                return ConversationGuard {
                    id: id.clone(),
                    slot: guard,
                };
            }
            // Cleared while we were queued; the map now holds a fresh slot or none.
        }
    }

    /// Snapshot of a conversation's messages, oldest first.
    ///
    /// Unknown keys yield an empty history and are not created.
    pub async fn history(&self, id: &ConversationId) -> Vec<Message> {
        match self.slot(id) {
            Some(slot) => {
                let slot = slot.lock().await;
                if slot.retired {
                    Vec::new()
                } else {
                    slot.messages.clone()
                }
            }
            None => Vec::new(),
        }
    }

    /// Delete a conversation. Returns whether anything was removed.
    ///
    /// Waits for an in-flight exchange on the same key, so the exchange lands
    /// before the clear rather than after it.
    pub async fn clear(&self, id: &ConversationId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };

        let mut guard = slot.clone().lock_owned().await;
        if guard.retired {
            return false;
        }
        guard.retired = true;
        guard.messages.clear();

        let mut conversations = self.conversations.lock().unwrap_or_else(|e| e.into_inner());
        if conversations
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, &slot))
        {
            conversations.remove(id);
        }
        debug!(conversation_id = %id, "Conversation cleared");
        true
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.conversations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one conversation for the duration of an exchange.
pub struct ConversationGuard {
    id: ConversationId,
    slot: OwnedMutexGuard<Slot>,
}

impl ConversationGuard {
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Current messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.slot.messages
    }

    pub fn len(&self) -> usize {
        self.slot.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.messages.is_empty()
    }

    /// Append one completed exchange and enforce [`MAX_HISTORY`].
    ///
    /// Returns the history length after truncation.
    pub fn append_exchange(&mut self, user: Message, assistant: Message) -> usize {
        let messages = &mut self.slot.messages;
        messages.push(user);
        messages.push(assistant);

        if messages.len() > MAX_HISTORY {
            let overflow = messages.len() - MAX_HISTORY;
            messages.drain(..overflow);
        }
        messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn id(s: &str) -> ConversationId {
        ConversationId::from(s)
    }

    #[tokio::test]
    async fn unknown_key_reads_empty_without_creating() {
        let store = ConversationStore::new();
        assert!(store.history(&id("ghost")).await.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn lock_creates_lazily() {
        let store = ConversationStore::new();
        let guard = store.lock(&id("abc")).await;
        assert!(guard.is_empty());
        assert_eq!(guard.id().as_str(), "abc");
        drop(guard);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn append_exchange_keeps_order() {
        let store = ConversationStore::new();
        let mut guard = store.lock(&id("abc")).await;
        let len = guard.append_exchange(Message::user("Hello"), Message::assistant("Hi there"));
        assert_eq!(len, 2);
        drop(guard);

        let history = store.history(&id("abc")).await;
        assert_eq!(
            history,
            vec![Message::user("Hello"), Message::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn history_is_capped_oldest_first() {
        let store = ConversationStore::new();
        let mut guard = store.lock(&id("cap")).await;
        let mut len = 0;
        for i in 0..15 {
            len = guard.append_exchange(
                Message::user(format!("q{i}")),
                Message::assistant(format!("a{i}")),
            );
        }
        assert_eq!(len, MAX_HISTORY);
        // 30 messages written, the first 10 (q0..a4) dropped.
        assert_eq!(guard.messages()[0], Message::user("q5"));
        assert_eq!(guard.messages()[19], Message::assistant("a14"));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = ConversationStore::new();
        store
            .lock(&id("abc"))
            .await
            .append_exchange(Message::user("a"), Message::assistant("b"));

        assert!(store.clear(&id("abc")).await);
        assert!(!store.clear(&id("abc")).await);
        assert!(store.history(&id("abc")).await.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = ConversationStore::new();
        store
            .lock(&id("one"))
            .await
            .append_exchange(Message::user("a"), Message::assistant("b"));
        store.lock(&id("two")).await;

        store.clear(&id("two")).await;
        assert_eq!(store.history(&id("one")).await.len(), 2);
    }

    #[tokio::test]
    async fn clear_waits_for_in_flight_exchange() {
        let store = Arc::new(ConversationStore::new());
        let mut guard = store.lock(&id("busy")).await;

        let clearer = {
            let store = store.clone();
            tokio::spawn(async move { store.clear(&id("busy")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!clearer.is_finished());

        guard.append_exchange(Message::user("q"), Message::assistant("a"));
        drop(guard);

        assert!(clearer.await.unwrap());
        assert!(store.history(&id("busy")).await.is_empty());
    }

    #[tokio::test]
    async fn exchange_queued_behind_clear_starts_fresh() {
        let store = Arc::new(ConversationStore::new());
        let mut first = store.lock(&id("k")).await;
        first.append_exchange(Message::user("old"), Message::assistant("old"));

        let clearer = {
            let store = store.clone();
            tokio::spawn(async move { store.clear(&id("k")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut guard = store.lock(&id("k")).await;
                let seen = guard.len();
                guard.append_exchange(Message::user("new"), Message::assistant("new"));
                seen
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert!(clearer.await.unwrap());
        assert_eq!(writer.await.unwrap(), 0);
        assert_eq!(
            store.history(&id("k")).await,
            vec![Message::user("new"), Message::assistant("new")]
        );
    }
}
