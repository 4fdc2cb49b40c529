//! Generation delegate: one completion call with a per-attempt timeout and
//! bounded retry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cg_domain::config::GenerationConfig;
use cg_domain::error::{Error, Result};
use cg_domain::prompt::PromptBundle;

use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::traits::CompletionProvider;

const SERVICE: &str = "completion";

/// Successful generation plus what it took to get there.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub attempts: u32,
    pub duration_ms: u64,
}

pub struct GenerationDelegate {
    provider: Arc<dyn CompletionProvider>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
}

impl GenerationDelegate {
    pub fn new(provider: Arc<dyn CompletionProvider>, policy: RetryPolicy, attempt_timeout: Duration) -> Self {
        Self {
            provider,
            policy,
            attempt_timeout,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, cfg: &GenerationConfig) -> Self {
        Self::new(
            provider,
            RetryPolicy::from_config(&cfg.retry),
            Duration::from_millis(cfg.timeout_ms),
        )
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    /// Generate a reply. A timed-out attempt counts as a transient failure;
    /// running out of attempts yields [`Error::RetriesExhausted`].
    pub async fn generate(&self, bundle: &PromptBundle, max_tokens: u32) -> Result<Generation> {
        let started = Instant::now();
        let mut attempts = 0;

        let result = retry_with_backoff(SERVICE, &self.policy, |attempt| {
            attempts = attempt;
            let provider = self.provider.clone();
            let timeout = self.attempt_timeout;
            async move {
                match tokio::time::timeout(timeout, provider.complete(bundle, max_tokens)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(format!(
                        "completion attempt {attempt} exceeded {}ms",
                        timeout.as_millis()
                    ))),
                }
            }
        })
        .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(text) => Ok(Generation {
                text,
                attempts,
                duration_ms,
            }),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider.provider_id(),
                    attempts,
                    duration_ms,
                    error = %e,
                    "generation failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_domain::language::Language;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Scripted {
        calls: AtomicU32,
        fail_first: u32,
        hang: bool,
    }

    #[async_trait::async_trait]
    impl CompletionProvider for Scripted {
        async fn complete(&self, _bundle: &PromptBundle, _max_tokens: u32) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if n <= self.fail_first {
                return Err(Error::Upstream {
                    service: "completion".into(),
                    status: Some(502),
                    message: "bad gateway".into(),
                });
            }
            Ok(format!("reply {n}"))
        }

        fn provider_id(&self) -> &str {
            "scripted"
        }
    }

    fn bundle() -> PromptBundle {
        PromptBundle {
            system: String::new(),
            history: Vec::new(),
            user_message: "hi".into(),
            language: Language::English,
        }
    }

    fn delegate(provider: Arc<Scripted>) -> GenerationDelegate {
        GenerationDelegate::new(
            provider,
            RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::from_millis(50),
                backoff_factor: 2.0,
            },
            Duration::from_millis(500),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_then_succeeds() {
        let provider = Arc::new(Scripted {
            calls: AtomicU32::new(0),
            fail_first: 2,
            hang: false,
        });
        let out = delegate(provider.clone()).generate(&bundle(), 100).await.unwrap();
        assert_eq!(out.text, "reply 3");
        assert_eq!(out.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_provider_resolves_to_exhausted() {
        let provider = Arc::new(Scripted {
            calls: AtomicU32::new(0),
            fail_first: 0,
            hang: true,
        });
        let err = delegate(provider.clone()).generate(&bundle(), 100).await.unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }
}
