//! The relay service: one chat exchange, history reads, and clears.

use std::sync::Arc;

use chatrelay_core::error::{Error, Result};
use chatrelay_core::message::{ConversationId, Message};
use chatrelay_core::provider::{GenerateRequest, Provider};
use chatrelay_memory::ConversationStore;
use tracing::{debug, error, info, warn};

use crate::assembler::assemble_prompt;

/// Input to a single chat exchange.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The user's text. Missing or empty is rejected.
    pub input: Option<String>,

    /// Conversation to continue; `None` or empty means the shared default.
    pub conversation_id: Option<String>,

    /// Whether to frame the prompt with recent history (default: true).
    pub include_history: Option<bool>,
}

impl ChatRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            ..Self::default()
        }
    }

    pub fn in_conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_history(mut self, include: bool) -> Self {
        self.include_history = Some(include);
        self
    }
}

/// Result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    /// The model's reply
    pub response: String,

    /// The conversation the exchange was recorded in
    pub conversation_id: ConversationId,

    /// History length after the exchange was recorded and trimmed
    pub history_length: usize,
}

/// Relays user input to the inference backend and keeps conversation history.
pub struct RelayService {
    /// The inference backend
    provider: Arc<dyn Provider>,

    /// Shared conversation history
    store: Arc<ConversationStore>,
}

impl RelayService {
    pub fn new(provider: Arc<dyn Provider>, store: Arc<ConversationStore>) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Run one exchange.
    ///
    /// The conversation stays locked from prompt assembly until the reply is
    /// recorded, so concurrent exchanges on one key are applied in turn. On a
    /// backend failure nothing is recorded.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let input = match request.input {
            Some(input) if !input.is_empty() => input,
            _ => {
                warn!("Rejecting chat request with missing or empty input");
                return Err(Error::InvalidInput);
            }
        };
        let conversation_id = ConversationId::resolve(request.conversation_id.as_deref());
        let include_history = request.include_history.unwrap_or(true);

        let mut conversation = self.store.lock(&conversation_id).await;
        let prompt = assemble_prompt(conversation.messages(), &input, include_history);

        debug!(
            conversation_id = %conversation.id(),
            new_conversation = conversation.is_empty(),
            history = conversation.len(),
            include_history,
            prompt_len = prompt.len(),
            "Prompt assembled"
        );

        let reply = self
            .provider
            .generate(GenerateRequest::new(prompt))
            .await
            .map_err(|e| {
                error!(
                    conversation_id = %conversation_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Error communicating with model"
                );
                Error::Provider(e)
            })?;

        let history_length = conversation.append_exchange(
            Message::user(input),
            Message::assistant(reply.response.clone()),
        );

        info!(
            conversation_id = %conversation_id,
            history_length,
            "Chat exchange recorded"
        );

        Ok(ChatOutcome {
            response: reply.response,
            conversation_id,
            history_length,
        })
    }

    /// Forget a conversation. Unknown keys are a no-op.
    pub async fn clear_conversation(&self, conversation_id: Option<&str>) {
        let conversation_id = ConversationId::resolve(conversation_id);
        let removed = self.store.clear(&conversation_id).await;
        info!(conversation_id = %conversation_id, removed, "Conversation clear requested");
    }

    /// Stored messages for a conversation, oldest first; empty if unknown.
    pub async fn get_history(&self, conversation_id: &str) -> Vec<Message> {
        self.store
            .history(&ConversationId::from(conversation_id))
            .await
    }
}
