use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cg_domain::error::Result;
use cg_domain::knowledge::KnowledgeMatch;
use cg_domain::language::Language;
use cg_domain::prompt::PromptBundle;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A generative model that turns a prompt bundle into reply text.
///
/// Implementations report transient conditions (timeouts, 429, 5xx) through
/// errors for which [`cg_domain::error::Error::is_transient`] is true; the
/// [`crate::GenerationDelegate`] decides whether to retry.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, bundle: &PromptBundle, max_tokens: u32) -> Result<String>;

    /// Identifier used in logs and trace events.
    fn provider_id(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Knowledge source
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Language-scoped factual lookup. One instance exists per supported language.
pub trait KnowledgeSource: Send + Sync {
    fn lookup(&self, message: &str) -> Vec<KnowledgeMatch>;

    /// Names of the bookable packages this source knows about.
    fn package_names(&self) -> Vec<String>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Escalation gateway
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffCredentials {
    pub token: String,
}

/// A live-agent chat opened for a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffSession {
    pub chat_id: String,
    pub credentials: HandoffCredentials,
}

#[async_trait::async_trait]
pub trait EscalationGateway: Send + Sync {
    async fn create_handoff_session(
        &self,
        session_id: &str,
        language: Language,
    ) -> Result<HandoffSession>;

    /// Deliver a message into an open hand-off chat. `Ok(false)` means the
    /// gateway refused it without a transport failure.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        credentials: &HandoffCredentials,
    ) -> Result<bool>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Telemetry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One completed turn, as broadcast to observers.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub session_id: String,
    pub language: Language,
    pub source: String,
    pub topic: Option<String>,
    pub message: String,
    pub response: String,
    pub at: DateTime<Utc>,
}

/// Fire-and-forget broadcast. Implementations must never block the caller
/// and must swallow their own failures.
pub trait TelemetrySink: Send + Sync {
    fn publish(&self, event: TelemetryEvent);
}
