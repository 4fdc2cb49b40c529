//! Session inspection and operator overrides.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cg_domain::language::Language;
use cg_domain::topic::Topic;
use cg_sessions::{ContextUpdate, Season, SessionContext};

use super::error_response;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub language: Language,
    pub last_topic: Option<Topic>,
    pub exchanges: usize,
    pub late_arrival: bool,
    pub booking_change_requested: bool,
    pub handoff: bool,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

impl From<&SessionContext> for SessionSummary {
    fn from(s: &SessionContext) -> Self {
        Self {
            session_id: s.id.clone(),
            language: s.language,
            last_topic: s.last_topic,
            exchanges: s.history.len(),
            late_arrival: s.late_arrival.is_active(),
            booking_change_requested: s.booking_modification.requested,
            handoff: s.handoff.is_some(),
            created_at: s.created_at,
            last_interaction: s.last_interaction,
        }
    }
}

/// Live sessions, most recently active first.
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions: Vec<SessionSummary> = state
        .pipeline
        .sessions()
        .list()
        .iter()
        .map(SessionSummary::from)
        .collect();

    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET / DELETE /v1/sessions/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.pipeline.sessions().snapshot(&id) {
        Some(session) => Json(session).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("session not found: {id}")),
    }
}

/// End a session and drop its cached answers.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let _permit = match state.session_locks.acquire(&id).await {
        Ok(permit) => permit,
        Err(e) => return error_response(StatusCode::CONFLICT, e.to_string()),
    };

    if state.pipeline.end_session(&id) {
        tracing::info!(session_id = %id, "session ended by operator");
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, format!("session not found: {id}"))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PATCH /v1/sessions/:id/flags
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Operator overrides for the seasonal sub-context.
#[derive(Debug, Default, Deserialize)]
pub struct FlagsUpdate {
    #[serde(default)]
    pub sold_out: Option<bool>,
    #[serde(default)]
    pub season: Option<Season>,
}

pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FlagsUpdate>,
) -> Response {
    if body.sold_out.is_none() && body.season.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "expected at least one of: sold_out, season",
        );
    }

    let _permit = match state.session_locks.acquire(&id).await {
        Ok(permit) => permit,
        Err(e) => return error_response(StatusCode::CONFLICT, e.to_string()),
    };

    let update = ContextUpdate {
        sold_out: body.sold_out,
        season: body.season,
        ..ContextUpdate::default()
    };
    match state.pipeline.sessions().apply_existing(&id, update) {
        Some(session) => {
            tracing::info!(
                session_id = %id,
                sold_out = session.seasonal.sold_out,
                season = session.seasonal.season.as_str(),
                "session flags updated"
            );
            Json(session.seasonal).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, format!("session not found: {id}")),
    }
}
