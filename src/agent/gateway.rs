//! Remote multi-agent gateway client.

use super::probe::ConnectionProber;
use super::retry::{RetryExecutor, RetryPolicy};
use super::wire::{post_chat_completion, ChatCompletionRequest, ChatMessage};
use super::{
    describe, ClassificationBackend, DelegationGateway, DelegationRequest, DelegationResult,
    GatewayError, HealthReport, ResponseProvider,
};
use crate::config::GatewayConfig;
use crate::logging::{EventSink, GatewayEvent};
use crate::routing::DestinationTable;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Token budget of a classification reply; one destination name fits.
const CLASSIFICATION_MAX_TOKENS: u32 = 16;

/// Gateway client speaking the OpenAI chat-completion protocol.
///
/// Handles the remote gateway with bearer authentication:
/// - Probe via GET /v1/models before every delegation
/// - Generation and delegation via POST /v1/chat/completions, retried
/// - Classification via one short, unretried POST
pub struct GatewayClient {
    /// Base URL (e.g., "http://vps.internal:18789")
    base_url: String,
    /// Bearer token; absence is reported before any I/O
    auth_token: Option<String>,
    namespace: String,
    default_agent: String,
    classifier_agent: String,
    request_timeout: Duration,
    classification_timeout: Duration,
    destinations: Arc<DestinationTable>,
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
    prober: ConnectionProber,
    retry: RetryExecutor,
    events: Arc<dyn EventSink>,
}

impl GatewayClient {
    pub fn new(
        base_url: String,
        config: &GatewayConfig,
        policy: RetryPolicy,
        destinations: Arc<DestinationTable>,
        client: Arc<Client>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: config.resolve_token(),
            namespace: config.namespace.clone(),
            default_agent: config.default_agent.clone(),
            classifier_agent: config.classifier_agent.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            classification_timeout: Duration::from_secs(config.classification_timeout_seconds),
            destinations,
            prober: ConnectionProber::new(
                Arc::clone(&client),
                Duration::from_secs(config.probe_timeout_seconds),
            ),
            client,
            retry: RetryExecutor::new(policy, Arc::clone(&events)),
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wire model id for an agent identity.
    pub fn model_for(&self, agent: &str) -> String {
        format!("{}:{}", self.namespace, agent)
    }

    fn bearer(&self) -> Result<&str, GatewayError> {
        self.auth_token.as_deref().ok_or_else(|| {
            GatewayError::Configuration(
                "Gateway token is not set (configure gateway.token or gateway.token_env)"
                    .to_string(),
            )
        })
    }

    /// Unique per delegation so concurrent requests never share remote sessions.
    fn session_tag(request: &DelegationRequest) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "delegate-{}-{}-{}",
            request.destination,
            chrono::Utc::now().timestamp_millis(),
            &nonce[..8]
        )
    }
}

#[async_trait]
impl ResponseProvider for GatewayClient {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn generate_response(
        &self,
        prompt: &str,
        caller_id: &str,
    ) -> Result<String, GatewayError> {
        let token = self.bearer()?;
        let request =
            ChatCompletionRequest::single_turn(self.model_for(&self.default_agent), prompt, caller_id);

        tracing::debug!(
            caller_id = %caller_id,
            model = %request.model,
            prompt_len = prompt.len(),
            "Generating response via gateway"
        );

        let client = self.client.as_ref();
        let base_url = self.base_url.as_str();
        let request = &request;
        let deadline = self.request_timeout;

        self.retry
            .run("generate_response", move || {
                post_chat_completion(client, base_url, token, request, deadline)
            })
            .await
    }

    async fn health_check(&self) -> HealthReport {
        let token = match self.bearer() {
            Ok(token) => token,
            Err(e) => return HealthReport::unhealthy(e.to_string()),
        };

        let start = Instant::now();
        let probe = self.prober.probe(&self.base_url, Some(token)).await;
        if !probe.reachable {
            return HealthReport::unhealthy(
                probe
                    .error
                    .unwrap_or_else(|| "Gateway unreachable".to_string()),
            );
        }

        let mut request = ChatCompletionRequest::single_turn(
            self.model_for(&self.default_agent),
            "ping",
            "relay-health-check",
        );
        request.max_tokens = Some(5);

        match post_chat_completion(
            &self.client,
            &self.base_url,
            token,
            &request,
            self.classification_timeout,
        )
        .await
        {
            Ok(_) => HealthReport::healthy(start.elapsed().as_millis() as u64),
            Err(e) => HealthReport::unhealthy(describe(&e)),
        }
    }
}

#[async_trait]
impl DelegationGateway for GatewayClient {
    async fn delegate_to_agent(
        &self,
        request: &DelegationRequest,
    ) -> Result<DelegationResult, GatewayError> {
        let token = self.bearer()?;
        let agent = self
            .destinations
            .agent_for(request.destination)
            .ok_or_else(|| {
                GatewayError::Configuration(format!(
                    "No agent configured for destination '{}'",
                    request.destination
                ))
            })?
            .to_string();

        self.events.emit(&GatewayEvent::ProbeStarted {
            base_url: self.base_url.clone(),
        });
        let probe = self.prober.probe(&self.base_url, Some(token)).await;
        self.events.emit(&GatewayEvent::ProbeFinished {
            base_url: self.base_url.clone(),
            reachable: probe.reachable,
            latency: probe.latency,
        });

        if !probe.reachable {
            return Err(GatewayError::Unreachable {
                base_url: self.base_url.clone(),
                reason: probe
                    .error
                    .unwrap_or_else(|| "no response".to_string()),
            });
        }

        let chat = ChatCompletionRequest::single_turn(
            self.model_for(&agent),
            &request.prompt,
            Self::session_tag(request),
        );

        tracing::info!(
            caller_id = %request.caller_id,
            destination = %request.destination,
            agent = %agent,
            probe_ms = probe.latency_ms(),
            "Delegating to specialist agent"
        );

        let operation = format!("delegate_to_agent({})", request.destination);
        let client = self.client.as_ref();
        let base_url = self.base_url.as_str();
        let chat = &chat;
        let deadline = self.request_timeout;

        let response = self
            .retry
            .run(&operation, move || {
                post_chat_completion(client, base_url, token, chat, deadline)
            })
            .await?;

        Ok(DelegationResult {
            destination: request.destination,
            agent,
            response,
        })
    }
}

#[async_trait]
impl ClassificationBackend for GatewayClient {
    async fn classify_completion(
        &self,
        instructions: &str,
        message: &str,
    ) -> Result<String, GatewayError> {
        let token = self.bearer()?;
        let request = ChatCompletionRequest {
            model: self.model_for(&self.classifier_agent),
            messages: vec![ChatMessage::system(instructions), ChatMessage::user(message)],
            user: Some("relay-router".to_string()),
            max_tokens: Some(CLASSIFICATION_MAX_TOKENS),
            temperature: Some(0.0),
        };

        post_chat_completion(
            &self.client,
            &self.base_url,
            token,
            &request,
            self.classification_timeout,
        )
        .await
    }
}
