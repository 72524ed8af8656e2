//! HTTP route handlers.

use super::error::ApiError;
use super::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};
use tutor_relay_domain::util::preview;
use tutor_relay_domain::{ChatTurnRequest, Message, StreamedChatResponse};

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to AI Tutor.";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

/// GET / - welcome message.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /aitutor/chat - stream one chat turn as server-sent events.
///
/// Each event is a single `data:` line carrying a JSON
/// [`StreamedChatResponse`]; the last one has `is_final = true`.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatTurnRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected chat body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    info!(
        conversation_id = %request.conversation_id,
        "POST /aitutor/chat: {}",
        preview(&request.message, 100)
    );

    let events = state.turns.stream_turn(request);
    let stream = ReceiverStream::new(events.into_inner())
        .map(|event| Event::default().json_data(StreamedChatResponse::from(event)));

    let sse = Sse::new(stream).keep_alive(KeepAlive::default());
    Ok((
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        sse,
    )
        .into_response())
}

/// GET /aitutor/conversations/{id} - stored history of one conversation.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let messages = state.turns.read(&conversation_id).ok_or_else(|| {
        ApiError::NotFound(format!("Conversation '{}' not found", conversation_id))
    })?;

    Ok(Json(ConversationResponse {
        conversation_id,
        messages,
    }))
}

/// DELETE /aitutor/conversations/{id} - forget a conversation.
///
/// Idempotent: unknown ids also return 204.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> StatusCode {
    state.turns.clear(&conversation_id);
    StatusCode::NO_CONTENT
}
