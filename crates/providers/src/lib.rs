//! Inference backend implementations for ChatRelay.
//!
//! All providers implement the `chatrelay_core::Provider` trait.

pub mod http;

pub use http::HttpInferenceProvider;

use chatrelay_config::UpstreamConfig;
use std::sync::Arc;

/// Build the configured provider, shared behind an `Arc`.
pub fn build_from_config(
    config: &UpstreamConfig,
) -> Result<Arc<dyn chatrelay_core::Provider>, chatrelay_core::ProviderError> {
    Ok(Arc::new(HttpInferenceProvider::from_config(config)?))
}
