use std::sync::Arc;

use chrono::{DateTime, Utc};

use cg_domain::config::Config;
use cg_pipeline::Pipeline;
use cg_providers::EscalationClient;

use crate::runtime::SessionLockMap;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    /// Live-agent hand-off. `None` when `[escalation]` is disabled.
    pub escalation: Option<Arc<EscalationClient>>,

    // ── Concurrency ───────────────────────────────────────────────────
    pub session_locks: Arc<SessionLockMap>,

    // ── Security ──────────────────────────────────────────────────────
    /// SHA-256 of the API bearer token, computed once at startup.
    /// `None` disables authentication (dev mode).
    pub api_token_hash: Option<Vec<u8>>,

    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        pipeline: Arc<Pipeline>,
        escalation: Option<Arc<EscalationClient>>,
        api_token_hash: Option<Vec<u8>>,
    ) -> Self {
        Self {
            config,
            pipeline,
            escalation,
            session_locks: Arc::new(SessionLockMap::new()),
            api_token_hash,
            started_at: Utc::now(),
        }
    }
}
