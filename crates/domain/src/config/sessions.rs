use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// In-memory session lifetime and history bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Idle time after which a session (and its cached answers) is evicted.
    #[serde(default = "d_ttl")]
    pub ttl_secs: u64,
    /// How often the background sweep runs.
    #[serde(default = "d_sweep")]
    pub sweep_interval_secs: u64,
    /// Number of guest/assistant exchanges kept per session.
    #[serde(default = "d_history")]
    pub history_limit: usize,
    /// Number of past topics kept per session.
    #[serde(default = "d_topics")]
    pub topic_history_limit: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: d_ttl(),
            sweep_interval_secs: d_sweep(),
            history_limit: d_history(),
            topic_history_limit: d_topics(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_ttl() -> u64 {
    1_800
}
fn d_sweep() -> u64 {
    300
}
fn d_history() -> usize {
    10
}
fn d_topics() -> usize {
    5
}
