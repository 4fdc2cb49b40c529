use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation (completion service)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// OpenAI-compatible endpoint.  Empty disables generation: every message
    /// that reaches the generation step gets the connectivity apology.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Per-attempt timeout.
    #[serde(default = "d_20000u")]
    pub timeout_ms: u64,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub budgets: TokenBudgets,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: d_model(),
            auth: AuthConfig::default(),
            timeout_ms: 20_000,
            temperature: d_temperature(),
            retry: RetryConfig::default(),
            budgets: TokenBudgets::default(),
        }
    }
}

/// Output-token budgets picked by message complexity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenBudgets {
    #[serde(default = "d_simple")]
    pub simple: u32,
    #[serde(default = "d_standard")]
    pub standard: u32,
    #[serde(default = "d_complex")]
    pub complex: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            simple: d_simple(),
            standard: d_standard(),
            complex: d_complex(),
        }
    }
}

/// Bounded exponential back-off shared by every upstream caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "d_3")]
    pub max_attempts: u32,
    #[serde(default = "d_500u")]
    pub initial_backoff_ms: u64,
    /// Must be greater than 1.0 so each delay is strictly longer.
    #[serde(default = "d_factor")]
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            backoff_factor: 2.0,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Escalation gateway (live-agent hand-off)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "d_10000u")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            auth: AuthConfig::default(),
            timeout_ms: d_10000u(),
            retry: RetryConfig::default(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Telemetry broadcast
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// When set, every turn is POSTed here as JSON (fire-and-forget).
    /// Otherwise events only go to the log.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "d_2000u")]
    pub timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: 2_000,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credentials
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Header name (e.g. "Authorization", "x-api-key").
    #[serde(default)]
    pub header: Option<String>,
    /// Header value prefix (e.g. "Bearer ").
    #[serde(default)]
    pub prefix: Option<String>,
    /// Env var containing the key.
    #[serde(default)]
    pub env: Option<String>,
    /// Direct key (for config-only setups; prefer env or keychain).
    #[serde(default)]
    pub key: Option<String>,
    /// Keychain service name (e.g., "concierge").
    #[serde(default)]
    pub service: Option<String>,
    /// Keychain account name (e.g., "completion-api-key").
    #[serde(default)]
    pub account: Option<String>,
}

impl AuthConfig {
    /// True when no credential source is configured at all.
    pub fn is_empty(&self) -> bool {
        self.env.is_none() && self.key.is_none() && self.service.is_none()
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_model() -> String {
    "gpt-4o-mini".into()
}
fn d_temperature() -> f32 {
    0.4
}
fn d_20000u() -> u64 {
    20_000
}
fn d_10000u() -> u64 {
    10_000
}
fn d_2000u() -> u64 {
    2_000
}
fn d_500u() -> u64 {
    500
}
fn d_3() -> u32 {
    3
}
fn d_factor() -> f64 {
    2.0
}
fn d_simple() -> u32 {
    150
}
fn d_standard() -> u32 {
    350
}
fn d_complex() -> u32 {
    600
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
