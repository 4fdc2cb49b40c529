//! `POST /v1/chat`: run one guest message through the pipeline.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use cg_sessions::resolve_session_id;

use super::error_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Caller-held session id. Missing or malformed ids get a fresh one,
    /// returned in the reply.
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> Response {
    if body.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    let (session_id, minted) = resolve_session_id(body.session_id.as_deref());
    if minted && body.session_id.is_some() {
        tracing::debug!(%session_id, "rejected client session id, minted a new one");
    }

    let _permit = match state.session_locks.acquire(&session_id).await {
        Ok(permit) => permit,
        Err(e) => return error_response(StatusCode::CONFLICT, e.to_string()),
    };

    let reply = state.pipeline.handle(&session_id, &body.message).await;
    Json(reply).into_response()
}
