//! Turn broadcast sinks.

use std::time::Duration;

use cg_domain::config::TelemetryConfig;
use cg_domain::error::Result;

use crate::traits::{TelemetryEvent, TelemetrySink};
use crate::util::from_reqwest;

/// Writes every turn to the log at debug level.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        tracing::debug!(
            session_id = %event.session_id,
            language = %event.language,
            source = %event.source,
            topic = event.topic.as_deref().unwrap_or("-"),
            "turn completed"
        );
    }
}

/// POSTs every turn as JSON to a webhook from a detached task.
pub struct WebhookTelemetry {
    url: String,
    client: reqwest::Client,
}

impl WebhookTelemetry {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// `None` when no webhook is configured.
    pub fn from_config(cfg: &TelemetryConfig) -> Result<Option<Self>> {
        match cfg.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                Self::new(url, Duration::from_millis(cfg.timeout_ms)).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl TelemetrySink for WebhookTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("telemetry webhook skipped: no async runtime");
            return;
        };
        let client = self.client.clone();
        let url = self.url.clone();
        handle.spawn(async move {
            match client.post(&url).json(&event).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => {
                    tracing::warn!(status = resp.status().as_u16(), url = %url, "telemetry webhook rejected event")
                }
                Err(e) => tracing::warn!(error = %e, url = %url, "telemetry webhook failed"),
            }
        });
    }
}
