//! OpenAI-compatible completion adapter.
//!
//! Works with OpenAI, Ollama, vLLM, LM Studio and any endpoint that follows
//! the chat completions contract.

use std::time::Duration;

use serde_json::Value;

use cg_domain::config::GenerationConfig;
use cg_domain::error::{Error, Result};
use cg_domain::prompt::{PromptBundle, Speaker};

use crate::traits::CompletionProvider;
use crate::util::{auth_header, from_reqwest, upstream_status};

const SERVICE: &str = "completion";

pub struct OpenAiCompatProvider {
    url: String,
    model: String,
    temperature: f32,
    auth: Option<(String, String)>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn from_config(cfg: &GenerationConfig) -> Result<Self> {
        if cfg.base_url.trim().is_empty() {
            return Err(Error::Config("generation.base_url is empty".into()));
        }

        // The delegate enforces the per-attempt timeout; this one only
        // guards against a connection that never completes.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms.saturating_mul(2).max(1_000)))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            url: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            auth: auth_header(&cfg.auth)?,
            client,
        })
    }

    fn build_body(&self, bundle: &PromptBundle, max_tokens: u32) -> Value {
        let mut messages = Vec::with_capacity(bundle.history.len() + 2);
        messages.push(serde_json::json!({ "role": "system", "content": bundle.system }));
        for turn in &bundle.history {
            let role = match turn.speaker {
                Speaker::Guest => "user",
                Speaker::Assistant => "assistant",
            };
            messages.push(serde_json::json!({ "role": role, "content": turn.text }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": bundle.user_message }));

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
            "temperature": self.temperature,
            "stream": false,
        })
    }
}

/// Pull the first choice's text out of a chat completions response.
fn parse_completion(body: &Value) -> Result<String> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Upstream {
            service: SERVICE.into(),
            status: None,
            message: "response has no choices[0].message.content".into(),
        })?;

    let text = content.trim();
    if text.is_empty() {
        return Err(Error::Upstream {
            service: SERVICE.into(),
            status: None,
            message: "empty completion".into(),
        });
    }
    Ok(text.to_owned())
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn complete(&self, bundle: &PromptBundle, max_tokens: u32) -> Result<String> {
        let body = self.build_body(bundle, max_tokens);

        tracing::debug!(url = %self.url, model = %self.model, max_tokens, "completion request");

        let mut req = self.client.post(&self.url).json(&body);
        if let Some((name, value)) = &self.auth {
            req = req.header(name.as_str(), value.as_str());
        }
        let resp = req.send().await.map_err(from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(from_reqwest)?;
        if !status.is_success() {
            return Err(upstream_status(SERVICE, status, &text));
        }

        let json: Value = serde_json::from_str(&text)?;
        parse_completion(&json)
    }

    fn provider_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_domain::language::Language;
    use cg_domain::prompt::HistoryTurn;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::from_config(&GenerationConfig {
            base_url: "http://localhost:11434/v1/".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = OpenAiCompatProvider::from_config(&GenerationConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn url_has_no_double_slash() {
        assert_eq!(provider().url, "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn body_orders_system_history_user() {
        let bundle = PromptBundle {
            system: "rules".into(),
            history: vec![
                HistoryTurn {
                    speaker: Speaker::Guest,
                    text: "hi".into(),
                },
                HistoryTurn {
                    speaker: Speaker::Assistant,
                    text: "hello".into(),
                },
            ],
            user_message: "what time do you open?".into(),
            language: Language::English,
        };
        let body = provider().build_body(&bundle, 350);
        let roles: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(body["max_tokens"], 350);
    }

    #[test]
    fn parse_completion_trims_text() {
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "  We open at 10:00.\n" } }]
        });
        assert_eq!(parse_completion(&body).unwrap(), "We open at 10:00.");
    }

    #[test]
    fn parse_completion_rejects_empty() {
        let body = serde_json::json!({ "choices": [{ "message": { "content": "   " } }] });
        let err = parse_completion(&body).unwrap_err();
        assert!(!err.is_transient());
    }
}
