//! Provider trait — the abstraction over the inference backend.
//!
//! A Provider takes a single assembled prompt string and returns the model's
//! reply. The relay never sees HTTP details; it only sees this trait, which
//! keeps the conversation logic testable with scripted mocks.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response-length hint sent with every generation request.
pub const MAX_LENGTH: u32 = 150;

/// Body of a generation request, `{ "prompt": ..., "max_length": ... }` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The assembled prompt
    pub prompt: String,

    /// Maximum number of new tokens the backend should produce
    pub max_length: u32,
}

impl GenerateRequest {
    /// Build a request carrying the fixed [`MAX_LENGTH`] hint.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_length: MAX_LENGTH,
        }
    }
}

/// Body of a generation response, `{ "response": ... }` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The reply text
    pub response: String,
}

/// The core Provider trait.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "http").
    fn name(&self) -> &str;

    /// Send a prompt and wait for the complete reply.
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<GenerateResponse, ProviderError>;

    /// Whether the backend is reachable and ready to serve.
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
