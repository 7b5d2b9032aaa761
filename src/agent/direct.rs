//! Direct OpenAI-compatible provider (no delegation).

use super::probe::ConnectionProber;
use super::retry::{RetryExecutor, RetryPolicy};
use super::wire::{post_chat_completion, ChatCompletionRequest};
use super::{GatewayError, HealthReport, ResponseProvider};
use crate::agent::probe::DEFAULT_PROBE_TIMEOUT;
use crate::config::DirectConfig;
use crate::logging::EventSink;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Plain chat-completion provider addressed by a fixed model name.
///
/// Used when no delegation-capable gateway is configured.
pub struct DirectProvider {
    name: String,
    base_url: String,
    /// API key for Bearer authentication
    api_key: Option<String>,
    model: String,
    request_timeout: Duration,
    client: Arc<Client>,
    prober: ConnectionProber,
    retry: RetryExecutor,
}

impl DirectProvider {
    pub fn new(
        config: &DirectConfig,
        policy: RetryPolicy,
        client: Arc<Client>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            prober: ConnectionProber::new(Arc::clone(&client), DEFAULT_PROBE_TIMEOUT),
            client,
            retry: RetryExecutor::new(policy, events),
        }
    }

    fn api_key(&self) -> Result<&str, GatewayError> {
        self.api_key.as_deref().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "Direct provider '{}' requires 'api_key' or 'api_key_env'",
                self.name
            ))
        })
    }
}

#[async_trait]
impl ResponseProvider for DirectProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_response(
        &self,
        prompt: &str,
        caller_id: &str,
    ) -> Result<String, GatewayError> {
        let api_key = self.api_key()?;
        let request = ChatCompletionRequest::single_turn(self.model.clone(), prompt, caller_id);

        tracing::debug!(
            provider = %self.name,
            model = %self.model,
            prompt_len = prompt.len(),
            "Generating response via direct provider"
        );

        let client = self.client.as_ref();
        let base_url = self.base_url.as_str();
        let request = &request;
        let deadline = self.request_timeout;

        self.retry
            .run("generate_response", move || {
                post_chat_completion(client, base_url, api_key, request, deadline)
            })
            .await
    }

    async fn health_check(&self) -> HealthReport {
        let api_key = match self.api_key() {
            Ok(key) => key,
            Err(e) => return HealthReport::unhealthy(e.to_string()),
        };

        let probe = self.prober.probe(&self.base_url, Some(api_key)).await;
        if probe.reachable {
            HealthReport::healthy(probe.latency_ms())
        } else {
            HealthReport::unhealthy(
                probe
                    .error
                    .unwrap_or_else(|| format!("{} unreachable", self.name)),
            )
        }
    }
}
