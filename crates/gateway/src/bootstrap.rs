//! AppState construction and background-task spawning.
//!
//! `serve` and `run` share [`build_app_state`] so a one-shot CLI turn goes
//! through exactly the same pipeline as an HTTP request.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sha2::{Digest, Sha256};

use cg_domain::config::{Config, ConfigSeverity, ServerConfig};
use cg_pipeline::{session_store, Collaborators, Pipeline};
use cg_providers::{EscalationClient, HttpEscalationGateway, RetryPolicy};

use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if error_count > 0 {
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── Sessions ─────────────────────────────────────────────────────
    let sessions = Arc::new(session_store(&config));
    tracing::info!(
        ttl_secs = config.sessions.ttl_secs,
        sweep_interval_secs = config.sessions.sweep_interval_secs,
        "session store ready"
    );

    // ── Pipeline ─────────────────────────────────────────────────────
    let collaborators = Collaborators::from_config(&config).context("initializing providers")?;
    let pipeline = Arc::new(
        Pipeline::new(&config, sessions, collaborators).context("initializing pipeline")?,
    );
    tracing::info!(
        venue = %pipeline.venue().name(),
        generation = pipeline.generation_configured(),
        cache = pipeline.cache().is_enabled(),
        detectors = ?pipeline.fast_path_detectors(),
        "pipeline ready"
    );

    // ── Escalation ───────────────────────────────────────────────────
    let escalation = if config.escalation.enabled {
        let gateway = HttpEscalationGateway::from_config(&config.escalation)
            .context("initializing escalation gateway")?;
        tracing::info!(base_url = %config.escalation.base_url, "escalation gateway ready");
        Some(Arc::new(EscalationClient::new(
            Arc::new(gateway),
            RetryPolicy::from_config(&config.escalation.retry),
        )))
    } else {
        tracing::info!("escalation disabled: POST /v1/handoff answers 503");
        None
    };

    let api_token_hash = api_token_hash(&config.server);

    Ok(AppState::new(config, pipeline, escalation, api_token_hash))
}

/// Read the bearer token from the env var named in `[server].api_token_env`
/// and return its SHA-256 digest, or `None` (auth disabled) when unset.
fn api_token_hash(server: &ServerConfig) -> Option<Vec<u8>> {
    let env_var = &server.api_token_env;
    match std::env::var(env_var).ok().filter(|t| !t.is_empty()) {
        Some(token) => {
            tracing::info!(source = %format!("env:{env_var}"), "API bearer-token auth enabled");
            Some(Sha256::digest(token.as_bytes()).to_vec())
        }
        None => {
            tracing::warn!("API bearer-token auth DISABLED: set the {env_var} env var");
            None
        }
    }
}

/// Spawn the periodic sweep: expired sessions, their cached answers and
/// session locks nobody holds.
pub fn spawn_background_tasks(state: &AppState) {
    let pipeline = state.pipeline.clone();
    let session_locks = state.session_locks.clone();
    let every = Duration::from_secs(state.config.sessions.sweep_interval_secs.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; nothing can be stale yet.
        interval.tick().await;
        loop {
            interval.tick().await;
            let (sessions, cache_entries) = pipeline.sweep_expired(chrono::Utc::now());
            let locks = session_locks.prune_idle();
            tracing::debug!(sessions, cache_entries, locks, "sweep finished");
        }
    });

    tracing::info!(interval_secs = every.as_secs(), "background sweep spawned");
}
