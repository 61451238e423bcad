//! HTTP/WebSocket Handlers

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message as WsMessage, WebSocket}},
    http::StatusCode,
    response::Response,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, ChatHandler, Message, SessionId};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model_reachable: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn agent_error(session: &SessionId, e: &AgentError) -> ApiError {
    match e {
        AgentError::Session(_) => {
            api_error(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", e.user_message())
        }
        _ => {
            tracing::error!(session = %session, error = %e, "Chat turn failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR", e.user_message())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_reachable = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        model_reachable,
    })
}

/// Start a chat session and return the welcome message
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ChatReply>), ApiError> {
    let id = SessionId::new();
    let welcome = state.chat.on_chat_start(id.clone()).map_err(|e| agent_error(&id, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ChatReply {
            session_id: id.to_string(),
            message: welcome,
        }),
    ))
}

/// Send one user message to a session
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "EMPTY_MESSAGE", "Message must not be empty"));
    }

    let id = SessionId::from_string(id);
    let reply = state
        .chat
        .on_message(&id, payload.message)
        .await
        .map_err(|e| agent_error(&id, &e))?;

    Ok(Json(ChatReply {
        session_id: id.to_string(),
        message: reply,
    }))
}

/// Ordered user/assistant turns of a session
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let id = SessionId::from_string(id);
    let session = state
        .chat
        .history(&id)
        .map_err(|e| agent_error(&id, &e))?
        .ok_or_else(|| {
            api_error(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", format!("Unknown session {id}"))
        })?;

    Ok(Json(HistoryResponse {
        session_id: id.to_string(),
        messages: session.history().to_vec(),
    }))
}

/// Drop a session and its history
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = SessionId::from_string(id);
    state.chat.end(&id).map_err(|e| agent_error(&id, &e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// WebSocket chat: one session per connection
pub async fn chat_ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let id = SessionId::new();

    let greeting = match state.chat.on_chat_start(id.clone()) {
        Ok(welcome) => message_frame(&welcome),
        Err(e) => error_frame(&e),
    };
    if sender.send(WsMessage::Text(greeting.into())).await.is_err() {
        return;
    }

    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Err(e) => {
                tracing::error!(session = %id, error = %e, "WebSocket error");
                break;
            }
            _ => continue,
        };

        let frame = reply_frame(&state.chat, &id, text.as_str()).await;
        if sender.send(WsMessage::Text(frame.into())).await.is_err() {
            break;
        }
    }

    if let Err(e) = state.chat.end(&id) {
        tracing::warn!(session = %id, error = %e, "Failed to drop session");
    }
}

/// Run one message-received cycle and render the outgoing frame
async fn reply_frame(chat: &ChatHandler, id: &SessionId, text: &str) -> String {
    match chat.on_message(id, text).await {
        Ok(reply) => message_frame(&reply),
        Err(e) => error_frame(&e),
    }
}

fn message_frame(content: &str) -> String {
    serde_json::json!({"type": "message", "content": content}).to_string()
}

fn error_frame(e: &AgentError) -> String {
    serde_json::json!({"type": "error", "error": e.user_message()}).to_string()
}
