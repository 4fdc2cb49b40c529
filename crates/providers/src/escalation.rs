//! Live-agent hand-off.
//!
//! [`HttpEscalationGateway`] speaks the gateway's REST contract;
//! [`EscalationClient`] adds the shared retry policy on top of any
//! [`EscalationGateway`].

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use cg_domain::config::EscalationConfig;
use cg_domain::error::{Error, Result};
use cg_domain::language::Language;
use cg_domain::trace::TraceEvent;

use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::{EscalationGateway, HandoffCredentials, HandoffSession};
use crate::util::{auth_header, from_reqwest, upstream_status};

const SERVICE: &str = "escalation";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP adapter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct HttpEscalationGateway {
    base_url: String,
    auth: Option<(String, String)>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    chat_id: String,
    #[serde(default)]
    token: String,
}

impl HttpEscalationGateway {
    pub fn from_config(cfg: &EscalationConfig) -> Result<Self> {
        if cfg.base_url.trim().is_empty() {
            return Err(Error::Config("escalation.base_url is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms.max(1)))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            auth: auth_header(&cfg.auth)?,
            client,
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let req = self.client.post(format!("{}{path}", self.base_url));
        match &self.auth {
            Some((name, value)) => req.header(name.as_str(), value.as_str()),
            None => req,
        }
    }
}

#[async_trait::async_trait]
impl EscalationGateway for HttpEscalationGateway {
    async fn create_handoff_session(
        &self,
        session_id: &str,
        language: Language,
    ) -> Result<HandoffSession> {
        let resp = self
            .post("/sessions")
            .json(&serde_json::json!({
                "session_id": session_id,
                "language": language.code(),
            }))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let body = resp.text().await.map_err(from_reqwest)?;
        if !status.is_success() {
            return Err(upstream_status(SERVICE, status, &body));
        }

        let parsed: CreateSessionResponse = serde_json::from_str(&body).map_err(|e| Error::Upstream {
            service: SERVICE.into(),
            status: Some(status.as_u16()),
            message: format!("unreadable session response: {e}"),
        })?;
        Ok(HandoffSession {
            chat_id: parsed.chat_id,
            credentials: HandoffCredentials {
                token: parsed.token,
            },
        })
    }

    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        credentials: &HandoffCredentials,
    ) -> Result<bool> {
        let mut req = self
            .post(&format!("/sessions/{chat_id}/messages"))
            .json(&serde_json::json!({ "text": text }));
        if !credentials.token.is_empty() {
            req = req.header("X-Chat-Token", credentials.token.as_str());
        }
        let resp = req.send().await.map_err(from_reqwest)?;

        let status = resp.status();
        if status.is_server_error() || status.as_u16() == 429 {
            let body = resp.text().await.unwrap_or_default();
            return Err(upstream_status(SERVICE, status, &body));
        }
        Ok(status.is_success())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retrying client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct EscalationClient {
    gateway: Arc<dyn EscalationGateway>,
    policy: RetryPolicy,
}

impl EscalationClient {
    pub fn new(gateway: Arc<dyn EscalationGateway>, policy: RetryPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Open a hand-off chat and, if given, forward the guest's message into
    /// it. Creation is retried; a failed first message is logged only,
    /// since the chat exists either way.
    pub async fn start_handoff(
        &self,
        session_id: &str,
        language: Language,
        first_message: Option<&str>,
    ) -> Result<HandoffSession> {
        let session = retry_with_backoff(SERVICE, &self.policy, |_| {
            let gateway = self.gateway.clone();
            async move { gateway.create_handoff_session(session_id, language).await }
        })
        .await?;

        TraceEvent::HandoffCreated {
            session_id: session_id.to_owned(),
            chat_id: session.chat_id.clone(),
        }
        .emit();

        if let Some(text) = first_message.filter(|t| !t.trim().is_empty()) {
            let sent = retry_with_backoff(SERVICE, &self.policy, |_| {
                let gateway = self.gateway.clone();
                let chat_id = session.chat_id.as_str();
                let credentials = &session.credentials;
                async move { gateway.send_message(chat_id, text, credentials).await }
            })
            .await;
            match sent {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(chat_id = %session.chat_id, "hand-off gateway refused first message")
                }
                Err(e) => {
                    tracing::warn!(chat_id = %session.chat_id, error = %e, "hand-off first message failed")
                }
            }
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use call_log::Log;

    struct Flaky {
        log: Log,
        fail_creates: u32,
    }

    #[async_trait::async_trait]
    impl EscalationGateway for Flaky {
        async fn create_handoff_session(&self, _session_id: &str, _language: Language) -> Result<HandoffSession> {
            let n = self.log.push(tokio::time::Instant::now());
            if n <= self.fail_creates {
                return Err(Error::Timeout("gateway slow".into()));
            }
            Ok(HandoffSession {
                chat_id: "chat-1".into(),
                credentials: HandoffCredentials { token: "t".into() },
            })
        }

        async fn send_message(&self, _chat_id: &str, _text: &str, _c: &HandoffCredentials) -> Result<bool> {
            Ok(true)
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            backoff_factor: 3.0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn creation_gives_up_at_max_attempts() {
        let log = Log::default();
        let gateway = Arc::new(Flaky {
            log: log.clone(),
            fail_creates: u32::MAX,
        });
        let client = EscalationClient::new(gateway, policy());
        let err = client
            .start_handoff("s1", Language::English, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));

        let stamps = log.stamps();
        assert_eq!(stamps.len(), 3);
        let first_gap = stamps[1] - stamps[0];
        let second_gap = stamps[2] - stamps[1];
        assert!(second_gap > first_gap);
    }

    #[tokio::test(start_paused = true)]
    async fn creation_recovers() {
        let log = Log::default();
        let gateway = Arc::new(Flaky {
            log: log.clone(),
            fail_creates: 1,
        });
        let client = EscalationClient::new(gateway, policy());
        let session = client
            .start_handoff("s1", Language::Spanish, Some("necesito ayuda"))
            .await
            .unwrap();
        assert_eq!(session.chat_id, "chat-1");
        assert_eq!(log.stamps().len(), 2);
    }

    mod call_log {
        use std::sync::{Arc, Mutex};
        use tokio::time::Instant;

        #[derive(Clone, Default)]
        pub struct Log(Arc<Mutex<Vec<Instant>>>);

        impl Log {
            /// Record a call and return its 1-based index.
            pub fn push(&self, at: Instant) -> u32 {
                let mut v = self.0.lock().unwrap();
                v.push(at);
                v.len() as u32
            }
            pub fn stamps(&self) -> Vec<Instant> {
                self.0.lock().unwrap().clone()
            }
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let cfg = EscalationConfig::default();
        assert!(HttpEscalationGateway::from_config(&cfg).is_err());
    }
}
