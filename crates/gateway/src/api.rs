//! Chat API consumed by the browser UI.
//!
//! Endpoints:
//!
//! - `POST /chat`                     — Relay a message, get the reply
//! - `POST /chat/clear`               — Forget a conversation
//! - `GET  /chat/history/{id}`        — Stored messages of a conversation
//!
//! Bodies use camelCase keys (`conversationId`, `includeHistory`,
//! `historyLength`) to match the UI.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use chatrelay_core::error::Error;
use chatrelay_core::message::Message;
use chatrelay_relay::ChatRequest;

use crate::SharedState;

/// Build the chat router.
pub fn chat_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/clear", post(clear_handler))
        .route("/chat/history/{conversation_id}", get(history_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestDto {
    /// The user's message.
    #[serde(default)]
    pub input: Option<String>,
    /// Existing conversation ID (omit to use the shared default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Fold recent history into the prompt. Only an explicit `false` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_history: Option<bool>,
}

impl From<ChatRequestDto> for ChatRequest {
    fn from(dto: ChatRequestDto) -> Self {
        ChatRequest {
            input: dto.input,
            conversation_id: dto.conversation_id,
            include_history: dto.include_history,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseDto {
    pub response: String,
    pub conversation_id: String,
    pub history_length: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequestDto {
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponseDto {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponseDto {
    pub history: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a relay failure onto the uniform client-facing error.
///
/// Backend details are logged by the relay, never returned to the caller.
impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        let error = if err.is_client_error() {
            err.to_string()
        } else {
            "Error communicating with the model".to_string()
        };
        ErrorResponse { error }
    }
}

fn relay_error(err: Error) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::from(err)))
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequestDto>, JsonRejection>,
) -> Result<Json<ChatResponseDto>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed chat body");
        api_error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let outcome = state
        .relay
        .handle_chat(payload.into())
        .await
        .map_err(relay_error)?;

    Ok(Json(ChatResponseDto {
        response: outcome.response,
        conversation_id: outcome.conversation_id.to_string(),
        history_length: outcome.history_length,
    }))
}

/// An empty body clears the default conversation.
async fn clear_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ClearResponseDto>, ApiError> {
    let payload: ClearRequestDto = if body.iter().all(u8::is_ascii_whitespace) {
        ClearRequestDto::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Rejected malformed clear body");
            api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"))
        })?
    };

    state
        .relay
        .clear_conversation(payload.conversation_id.as_deref())
        .await;

    Ok(Json(ClearResponseDto {
        success: true,
        message: "Conversation cleared".into(),
    }))
}

async fn history_handler(
    State(state): State<SharedState>,
    Path(conversation_id): Path<String>,
) -> Json<HistoryResponseDto> {
    let history = state.relay.get_history(&conversation_id).await;
    info!(conversation_id = %conversation_id, messages = history.len(), "History requested");
    Json(HistoryResponseDto { history })
}
