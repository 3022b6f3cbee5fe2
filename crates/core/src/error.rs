//! Error types for the ChatRelay domain.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// The top-level error type for all relay operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or empty user text. Raised before any backend call.
    #[error("Input is missing or empty")]
    InvalidInput,

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl Error {
    /// Whether the caller, rather than the relay or its backend, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput)
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures talking to the upstream inference backend.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Malformed response from backend: {0}")]
    MalformedResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
