use serde::Serialize;

/// Structured trace events emitted across all Concierge crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LanguageResolved {
        session_id: String,
        language: String,
        confidence: String,
        previous: String,
    },
    FastPathMatched {
        session_id: String,
        detector: String,
        category: String,
    },
    ScenarioDetected {
        session_id: String,
        kind: String,
        minutes: Option<i64>,
    },
    CacheHit {
        session_id: String,
        language: String,
    },
    KnowledgeRetrieved {
        session_id: String,
        matches: usize,
        confidence: f64,
        restricted_to_topic: Option<String>,
    },
    UnknownTopic {
        session_id: String,
        language: String,
    },
    GenerationRequest {
        session_id: String,
        max_tokens: u32,
        attempts: u32,
        duration_ms: u64,
        ok: bool,
    },
    GenerationRetry {
        service: String,
        attempt: u32,
        delay_ms: u64,
        reason: String,
    },
    HandoffCreated {
        session_id: String,
        chat_id: String,
    },
    SessionResolved {
        session_id: String,
        is_new: bool,
    },
    SessionsSwept {
        sessions_removed: usize,
        cache_entries_removed: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "cg_event");
    }
}
