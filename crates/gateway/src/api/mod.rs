pub mod auth;
pub mod chat;
pub mod handoff;
pub mod health;
pub mod sessions;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
///
/// `/health` is public; every `/v1` route sits behind the bearer-token
/// middleware. `state` is needed to wire that middleware at build time.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health::health));

    let protected = Router::new()
        .route("/v1/chat", post(chat::chat))
        .route("/v1/sessions", get(sessions::list_sessions))
        .route(
            "/v1/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/v1/sessions/:id/flags", patch(sessions::update_flags))
        .route("/v1/handoff", post(handoff::handoff))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    public.merge(protected)
}

/// JSON error body shared by every handler.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}
