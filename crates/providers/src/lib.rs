pub mod escalation;
pub mod generation;
pub mod knowledge;
pub mod openai_compat;
pub mod retry;
pub mod telemetry;
pub mod traits;
pub mod util;

// Re-exports for convenience.
pub use escalation::{EscalationClient, HttpEscalationGateway};
pub use generation::{Generation, GenerationDelegate};
pub use knowledge::StaticKnowledgeBase;
pub use openai_compat::OpenAiCompatProvider;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use telemetry::{LogTelemetry, WebhookTelemetry};
pub use traits::{
    CompletionProvider, EscalationGateway, HandoffCredentials, HandoffSession, KnowledgeSource,
    TelemetryEvent, TelemetrySink,
};
