mod llm;
mod observability;
mod pipeline;
mod server;
mod sessions;

pub use llm::*;
pub use observability::*;
pub use pipeline::*;
pub use server::*;
pub use sessions::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub venue: VenueConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error("server.port", "port must be greater than 0"));
        }
        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.sessions.ttl_secs == 0 {
            errors.push(ConfigError::error("sessions.ttl_secs", "ttl must be greater than 0"));
        }
        if self.sessions.sweep_interval_secs == 0 {
            errors.push(ConfigError::error(
                "sessions.sweep_interval_secs",
                "sweep interval must be greater than 0",
            ));
        }
        if self.sessions.history_limit == 0 {
            errors.push(ConfigError::warning(
                "sessions.history_limit",
                "history disabled: follow-up questions lose their context",
            ));
        }
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            errors.push(ConfigError::error("cache.ttl_secs", "ttl must be greater than 0"));
        }

        if !self.language.default.is_known() {
            errors.push(ConfigError::error(
                "language.default",
                "default language must be \"en\" or \"es\"",
            ));
        }

        if self.generation.base_url.is_empty() {
            errors.push(ConfigError::warning(
                "generation.base_url",
                "no completion service configured; non fast-path questions get an apology",
            ));
        }
        for (field, retry) in [
            ("generation.retry", &self.generation.retry),
            ("escalation.retry", &self.escalation.retry),
        ] {
            if retry.max_attempts == 0 {
                errors.push(ConfigError::error(
                    format!("{field}.max_attempts"),
                    "at least one attempt is required",
                ));
            }
            if retry.backoff_factor <= 1.0 {
                errors.push(ConfigError::error(
                    format!("{field}.backoff_factor"),
                    "factor must be greater than 1.0 so delays strictly increase",
                ));
            }
        }

        if self.escalation.enabled && self.escalation.base_url.is_empty() {
            errors.push(ConfigError::error(
                "escalation.base_url",
                "escalation is enabled but base_url is empty",
            ));
        }

        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError::warning(
                "server.cors.allowed_origins",
                "wildcard \"*\" allows all origins (not recommended for production)",
            ));
        }

        errors
    }
}
