//! HTTP API gateway for ChatRelay.
//!
//! Exposes the chat endpoints consumed by the browser UI plus a health check.
//! Built on Axum.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use chatrelay_config::{AppConfig, GatewayConfig};
use chatrelay_memory::ConversationStore;
use chatrelay_relay::RelayService;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub relay: RelayService,
}

impl GatewayState {
    pub fn new(relay: RelayService) -> Self {
        Self { relay }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes, without outer layers.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(api::chat_router(state))
}

/// Build the full router served in production.
///
/// Layers applied:
/// - CORS for the browser UI
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_full_router(state: SharedState, config: &GatewayConfig) -> Router {
    build_router(state)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors_layer(&config.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS policy for the UI.
///
/// With no configured origins, any requesting origin is echoed back and
/// credentials are allowed, so the UI works from whatever host serves it.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Builds the provider and the conversation store once and serves until
/// Ctrl-C. Conversation history lives only as long as this call.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.listen_addr();

    let provider = chatrelay_providers::build_from_config(&config.upstream)?;
    let store = Arc::new(ConversationStore::new());
    let state = Arc::new(GatewayState::new(RelayService::new(provider, store)));

    let app = build_full_router(state, &config.gateway);

    info!(addr = %addr, upstream = %config.upstream.url, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
