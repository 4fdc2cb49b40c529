//! `POST /v1/handoff`: open a live-agent chat for an existing session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use cg_sessions::ContextUpdate;

use super::error_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HandoffRequest {
    pub session_id: String,
    /// Forwarded into the new chat as the guest's first message.
    #[serde(default)]
    pub message: Option<String>,
}

pub async fn handoff(State(state): State<AppState>, Json(body): Json<HandoffRequest>) -> Response {
    let Some(client) = state.escalation.clone() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "escalation is not configured");
    };

    let Some(session) = state.pipeline.sessions().snapshot(&body.session_id) else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("session not found: {}", body.session_id),
        );
    };
    let language = session
        .language
        .known()
        .unwrap_or(state.config.language.default);

    // The session lock is not held here: creation may back off for several
    // seconds and the guest can keep chatting meanwhile.
    let handoff = match client
        .start_handoff(&session.id, language, body.message.as_deref())
        .await
    {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!(session_id = %session.id, error = %e, "hand-off failed");
            return error_response(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    let update = ContextUpdate {
        handoff_chat_id: Some(handoff.chat_id.clone()),
        ..ContextUpdate::default()
    };
    if state.pipeline.sessions().apply_existing(&session.id, update).is_none() {
        tracing::warn!(
            session_id = %session.id,
            chat_id = %handoff.chat_id,
            "session expired before the hand-off could be recorded"
        );
    }

    Json(serde_json::json!({
        "session_id": session.id,
        "chat_id": handoff.chat_id,
        "token": handoff.credentials.token,
    }))
    .into_response()
}
