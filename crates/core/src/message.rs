//! Message and conversation identity types.
//!
//! A relay exchange always produces a pair: the user's input followed by the
//! assistant's reply. Messages are never edited once stored.

use serde::{Deserialize, Serialize};

/// Identifier of a conversation (chat session).
///
/// Callers that omit an id all share [`ConversationId::DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// The key shared by every caller that does not supply one.
    pub const DEFAULT: &'static str = "default";

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Resolve an optional caller-supplied id, falling back to the shared default.
    ///
    /// An empty string counts as absent.
    pub fn resolve(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self::from(id),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The model's reply
    Assistant,
}

impl Role {
    /// Label used when folding history into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Render as a `"<Role>: <content>"` prompt line.
    pub fn prompt_line(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}
