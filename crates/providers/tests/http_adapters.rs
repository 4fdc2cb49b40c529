//! HTTP adapters against in-process axum stubs: real sockets, no external
//! services.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use cg_domain::config::{AuthConfig, EscalationConfig, GenerationConfig};
use cg_domain::error::Error;
use cg_domain::language::Language;
use cg_domain::prompt::PromptBundle;
use cg_providers::{
    CompletionProvider, EscalationClient, EscalationGateway, GenerationDelegate,
    HttpEscalationGateway, OpenAiCompatProvider, RetryPolicy,
};

#[derive(Default)]
struct Stub {
    /// Answer 503 to this many requests before succeeding.
    failures: u32,
    calls: AtomicU32,
    authorization: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn record(stub: &Stub, headers: &HeaderMap, body: Value) -> u32 {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        stub.authorization.lock().unwrap().push(auth.to_owned());
    }
    stub.bodies.lock().unwrap().push(body);
    stub.calls.fetch_add(1, Ordering::SeqCst) + 1
}

async fn completions(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = record(&stub, &headers, body);
    if n <= stub.failures {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "overloaded" })),
        );
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Welcome to the hammam.  " } }]
        })),
    )
}

fn bundle() -> PromptBundle {
    PromptBundle {
        system: "STYLE_RULES\nBe brief.".into(),
        history: Vec::new(),
        user_message: "What is the hammam ritual?".into(),
        language: Language::English,
    }
}

fn generation_config(base: &str) -> GenerationConfig {
    GenerationConfig {
        base_url: format!("{base}/v1"),
        auth: AuthConfig {
            key: Some("sk-test".into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

// ── completion ──────────────────────────────────────────────────────

#[tokio::test]
async fn completion_round_trip_sends_auth_and_budget() {
    let stub = Arc::new(Stub::default());
    let base = serve(
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(stub.clone()),
    )
    .await;

    let provider = OpenAiCompatProvider::from_config(&generation_config(&base)).unwrap();
    let text = provider.complete(&bundle(), 350).await.unwrap();

    assert_eq!(text, "Welcome to the hammam.");
    assert_eq!(stub.authorization.lock().unwrap().as_slice(), ["Bearer sk-test"]);
    let body = stub.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["max_tokens"], 350);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "What is the hammam ritual?");
}

#[tokio::test]
async fn delegate_retries_service_unavailable() {
    let stub = Arc::new(Stub {
        failures: 2,
        ..Default::default()
    });
    let base = serve(
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(stub.clone()),
    )
    .await;

    let provider = Arc::new(OpenAiCompatProvider::from_config(&generation_config(&base)).unwrap());
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 2.0,
    };
    let delegate = GenerationDelegate::new(provider, policy, Duration::from_secs(5));

    let generation = delegate.generate(&bundle(), 150).await.unwrap();
    assert_eq!(generation.attempts, 3);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn delegate_gives_up_after_max_attempts() {
    let stub = Arc::new(Stub {
        failures: u32::MAX,
        ..Default::default()
    });
    let base = serve(
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(stub.clone()),
    )
    .await;

    let provider = Arc::new(OpenAiCompatProvider::from_config(&generation_config(&base)).unwrap());
    let policy = RetryPolicy {
        max_attempts: 2,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 2.0,
    };
    let delegate = GenerationDelegate::new(provider, policy, Duration::from_secs(5));

    let err = delegate.generate(&bundle(), 150).await.unwrap_err();
    assert!(matches!(err, Error::RetriesExhausted { attempts: 2, .. }), "{err:?}");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
}

// ── escalation ──────────────────────────────────────────────────────

async fn create_session(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = record(&stub, &headers, body);
    if n <= stub.failures {
        return (StatusCode::BAD_GATEWAY, Json(Value::Null));
    }
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "chat_id": "c-77", "token": "t-1" })),
    )
}

async fn post_message(
    State(stub): State<Arc<Stub>>,
    Path(chat_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let token = headers
        .get("x-chat-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    record(
        &stub,
        &headers,
        serde_json::json!({ "chat_id": chat_id, "token": token, "body": body }),
    );
    StatusCode::OK
}

#[tokio::test]
async fn handoff_creates_chat_and_forwards_first_message() {
    let stub = Arc::new(Stub {
        failures: 1,
        ..Default::default()
    });
    let base = serve(
        Router::new()
            .route("/sessions", post(create_session))
            .route("/sessions/:chat_id/messages", post(post_message))
            .with_state(stub.clone()),
    )
    .await;

    let gateway = HttpEscalationGateway::from_config(&EscalationConfig {
        enabled: true,
        base_url: base,
        ..Default::default()
    })
    .unwrap();
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 2.0,
    };
    let gateway: Arc<dyn EscalationGateway> = Arc::new(gateway);
    let client = EscalationClient::new(gateway, policy);

    let session = client
        .start_handoff("guest-1", Language::Spanish, Some("Quiero hablar con alguien"))
        .await
        .unwrap();
    assert_eq!(session.chat_id, "c-77");
    assert_eq!(session.credentials.token, "t-1");

    let bodies = stub.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 3, "one failed create, one create, one message");
    assert_eq!(bodies[1]["session_id"], "guest-1");
    assert_eq!(bodies[1]["language"], "es");
    assert_eq!(bodies[2]["chat_id"], "c-77");
    assert_eq!(bodies[2]["token"], "t-1");
    assert_eq!(bodies[2]["body"]["text"], "Quiero hablar con alguien");
}
