use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use sha2::{Digest, Sha256};
use tower::ServiceExt;

use cg_domain::config::Config;
use cg_domain::error::{Error, Result};
use cg_domain::language::Language;
use cg_gateway::api;
use cg_gateway::state::AppState;
use cg_pipeline::Pipeline;
use cg_providers::{
    EscalationClient, EscalationGateway, HandoffCredentials, HandoffSession, RetryPolicy,
};

// ── helpers ─────────────────────────────────────────────────────────

struct FixedGateway {
    fail: bool,
}

#[async_trait::async_trait]
impl EscalationGateway for FixedGateway {
    async fn create_handoff_session(&self, session_id: &str, _language: Language) -> Result<HandoffSession> {
        if self.fail {
            return Err(Error::Upstream {
                service: "escalation".into(),
                status: Some(400),
                message: "rejected".into(),
            });
        }
        Ok(HandoffSession {
            chat_id: format!("chat-{session_id}"),
            credentials: HandoffCredentials {
                token: "tok".into(),
            },
        })
    }

    async fn send_message(&self, _chat_id: &str, _text: &str, _credentials: &HandoffCredentials) -> Result<bool> {
        Ok(true)
    }
}

fn state_with(escalation: Option<FixedGateway>, token: Option<&str>) -> AppState {
    let config = Arc::new(Config::default());
    let pipeline = Arc::new(Pipeline::from_config(&config).unwrap());
    let escalation = escalation
        .map(|gw| Arc::new(EscalationClient::new(Arc::new(gw), RetryPolicy::default())));
    let token_hash = token.map(|t| Sha256::digest(t.as_bytes()).to_vec());
    AppState::new(config, pipeline, escalation, token_hash)
}

fn app(state: AppState) -> Router {
    api::router(state.clone()).with_state(state)
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn chat(app: &Router, body: serde_json::Value) -> serde_json::Value {
    let (status, body) = send(app, json_request(Method::POST, "/v1/chat", body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

// ── auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public_even_with_a_token() {
    let app = app(state_with(None, Some("secret")));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["generation_configured"], false);
    assert_eq!(body["escalation_configured"], false);
}

#[tokio::test]
async fn v1_routes_require_the_bearer_token() {
    let app = app(state_with(None, Some("secret")));

    let (status, _) = send(&app, get("/v1/sessions")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri("/v1/sessions")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, wrong).await.0, StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .uri("/v1/sessions")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, right).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

// ── chat ────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_mints_a_session_and_answers_a_greeting() {
    let app = app(state_with(None, None));

    let reply = chat(&app, serde_json::json!({ "message": "hello" })).await;
    let session_id = reply["session_id"].as_str().unwrap().to_owned();
    assert!(!session_id.is_empty());
    assert_eq!(reply["source"], "fast_path");
    assert_eq!(reply["language"]["detected"], "en");
    assert!(!reply["message"].as_str().unwrap().is_empty());

    let (status, session) = send(&app, get(&format!("/v1/sessions/{session_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn chat_keeps_a_valid_client_id_and_replaces_a_malformed_one() {
    let app = app(state_with(None, None));

    let kept = chat(&app, serde_json::json!({ "message": "hello", "session_id": "guest-42" })).await;
    assert_eq!(kept["session_id"], "guest-42");

    let replaced = chat(&app, serde_json::json!({ "message": "hello", "session_id": "no spaces allowed" })).await;
    assert_ne!(replaced["session_id"], "no spaces allowed");
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = app(state_with(None, None));

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/v1/chat", serde_json::json!({ "message": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn unanswerable_question_without_knowledge_is_unknown_topic() {
    let app = app(state_with(None, None));

    let reply = chat(
        &app,
        serde_json::json!({ "message": "Can I bring my own surfboard to the rooftop terrace tomorrow?" }),
    )
    .await;
    assert_eq!(reply["source"], "unknown_topic");
}

// ── sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_a_session_ends_it() {
    let app = app(state_with(None, None));
    chat(&app, serde_json::json!({ "message": "hello", "session_id": "s-del" })).await;

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/v1/sessions/s-del")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete).await.0, StatusCode::NO_CONTENT);

    assert_eq!(send(&app, get("/v1/sessions/s-del")).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn operators_can_override_seasonal_flags() {
    let app = app(state_with(None, None));
    chat(&app, serde_json::json!({ "message": "hello", "session_id": "s-flags" })).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/v1/sessions/s-flags/flags",
            serde_json::json!({ "sold_out": true, "season": "winter" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sold_out"], true);
    assert_eq!(body["season"], "winter");

    let (status, _) = send(
        &app,
        json_request(Method::PATCH, "/v1/sessions/s-flags/flags", serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::PATCH,
            "/v1/sessions/missing/flags",
            serde_json::json!({ "sold_out": false }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── handoff ─────────────────────────────────────────────────────────

#[tokio::test]
async fn handoff_without_escalation_is_unavailable() {
    let app = app(state_with(None, None));
    chat(&app, serde_json::json!({ "message": "hello", "session_id": "s-h" })).await;

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/v1/handoff", serde_json::json!({ "session_id": "s-h" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn handoff_records_the_chat_on_the_session() {
    let app = app(state_with(Some(FixedGateway { fail: false }), None));
    chat(&app, serde_json::json!({ "message": "hello", "session_id": "s-h" })).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/v1/handoff",
            serde_json::json!({ "session_id": "s-h", "message": "I need a person" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chat_id"], "chat-s-h");

    let (_, session) = send(&app, get("/v1/sessions/s-h")).await;
    assert_eq!(session["handoff"]["chat_id"], "chat-s-h");
}

#[tokio::test]
async fn handoff_for_unknown_session_or_failed_gateway() {
    let app = app(state_with(Some(FixedGateway { fail: true }), None));

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/v1/handoff", serde_json::json!({ "session_id": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    chat(&app, serde_json::json!({ "message": "hello", "session_id": "s-f" })).await;
    let (status, _) = send(
        &app,
        json_request(Method::POST, "/v1/handoff", serde_json::json!({ "session_id": "s-f" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
