//! Conversation history storage for ChatRelay.

pub mod store;

pub use store::{ConversationGuard, ConversationStore, MAX_HISTORY};
