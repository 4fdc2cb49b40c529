use axum::extract::State;
use axum::response::{IntoResponse, Json};
use chrono::Utc;

use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /health (public, no auth)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let pipeline = &state.pipeline;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": (Utc::now() - state.started_at).num_seconds().max(0),
        "sessions": pipeline.sessions().len(),
        "cache_entries": pipeline.cache().len(),
        "cache_enabled": pipeline.cache().is_enabled(),
        "generation_configured": pipeline.generation_configured(),
        "escalation_configured": state.escalation.is_some(),
    }))
}
