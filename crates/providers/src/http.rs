//! HTTP inference provider.
//!
//! Talks to a self-hosted model server exposing:
//! - `POST /generate` with `{ "prompt", "max_length" }` → `{ "response" }`
//! - `GET  /health` → 200 when the model is loaded, 503 while loading
//!
//! No retries are performed; every failure is reported as a `ProviderError`
//! and left for the relay to surface.

use async_trait::async_trait;
use chatrelay_config::UpstreamConfig;
use chatrelay_core::error::ProviderError;
use chatrelay_core::provider::{GenerateRequest, GenerateResponse, Provider};
use std::time::Duration;
use tracing::{debug, warn};

/// A provider backed by a plain JSON-over-HTTP generation endpoint.
pub struct HttpInferenceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpInferenceProvider {
    /// Create a provider for `base_url`, with an optional request timeout.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a provider from the `[upstream]` config section.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ProviderError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(&config.url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for HttpInferenceProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<GenerateResponse, ProviderError> {
        let url = format!("{}/generate", self.base_url);

        debug!(
            url = %url,
            prompt_len = request.prompt.len(),
            max_length = request.max_length,
            "Sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::map_send_error)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Backend returned error");
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str::<GenerateResponse>(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = HttpInferenceProvider::new("http://localhost:5000/", None).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:5000");
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let config = UpstreamConfig {
            url: "http://model:5000".into(),
            timeout_secs: 0,
        };
        let provider = HttpInferenceProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url(), "http://model:5000");
    }

    #[tokio::test]
    async fn generate_posts_prompt_and_length_hint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .match_body(Matcher::Json(serde_json::json!({
                "prompt": "Hello",
                "max_length": 150
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "Hi there"}"#)
            .create_async()
            .await;

        let provider = HttpInferenceProvider::new(server.url(), None).unwrap();
        let reply = provider.generate(GenerateRequest::new("Hello")).await.unwrap();

        assert_eq!(reply.response, "Hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate")
            .with_status(503)
            .with_body(r#"{"error": "Model is still loading."}"#)
            .create_async()
            .await;

        let provider = HttpInferenceProvider::new(server.url(), None).unwrap();
        let err = provider
            .generate(GenerateRequest::new("Hello"))
            .await
            .unwrap_err();

        match err {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 503);
                assert!(message.contains("loading"));
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_response_field_is_malformed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate")
            .with_status(200)
            .with_body(r#"{"text": "wrong key"}"#)
            .create_async()
            .await;

        let provider = HttpInferenceProvider::new(server.url(), None).unwrap();
        let err = provider
            .generate(GenerateRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) is reserved and nothing listens on it in test environments.
        let provider = HttpInferenceProvider::new("http://127.0.0.1:9", None).unwrap();
        let err = provider
            .generate(GenerateRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Network(_) | ProviderError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn health_check_follows_status() {
        let mut server = Server::new_async().await;
        let _ready = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ready"}"#)
            .create_async()
            .await;

        let provider = HttpInferenceProvider::new(server.url(), None).unwrap();
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn health_check_reports_loading_model() {
        let mut server = Server::new_async().await;
        let _loading = server
            .mock("GET", "/health")
            .with_status(503)
            .with_body(r#"{"status": "loading"}"#)
            .create_async()
            .await;

        let provider = HttpInferenceProvider::new(server.url(), None).unwrap();
        assert!(!provider.health_check().await.unwrap());
    }
}
