//! Delegation orchestrator
//!
//! Per inbound message, terminal on the first success:
//! 1. classify and delegate to a specialist (delegation-capable mode only)
//! 2. direct generation with the persona-augmented prompt
//! 3. a static apology in the persona's tone
//!
//! [`Orchestrator::handle`] never fails. Each step down emits
//! [`GatewayEvent::FallbackEngaged`].

pub mod persona;

pub use persona::{Persona, Tone};

use crate::agent::factory::create_mode;
use crate::agent::{
    DelegationGateway, DelegationRequest, DelegationResult, Destination, GatewayError,
    HealthReport, ResponseProvider,
};
use crate::config::{ConfigError, RelayConfig};
use crate::logging::{EventSink, FallbackTier, GatewayEvent};
use crate::routing::TaskRouter;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Provider capability, resolved once at construction.
#[derive(Clone)]
pub enum ProviderMode {
    /// Only plain generation is available.
    DirectOnly(Arc<dyn ResponseProvider>),
    /// A gateway that can delegate to specialists, and the router choosing them.
    DelegationCapable {
        gateway: Arc<dyn DelegationGateway>,
        router: TaskRouter,
    },
}

impl ProviderMode {
    pub fn is_delegation_capable(&self) -> bool {
        matches!(self, ProviderMode::DelegationCapable { .. })
    }

    /// "delegation" or "direct".
    pub fn label(&self) -> &'static str {
        match self {
            ProviderMode::DirectOnly(_) => "direct",
            ProviderMode::DelegationCapable { .. } => "delegation",
        }
    }

    pub fn provider_name(&self) -> &str {
        match self {
            ProviderMode::DirectOnly(provider) => provider.name(),
            ProviderMode::DelegationCapable { gateway, .. } => gateway.name(),
        }
    }

    /// Plain generation through whichever provider this mode holds.
    pub async fn generate_response(
        &self,
        prompt: &str,
        caller_id: &str,
    ) -> Result<String, GatewayError> {
        match self {
            ProviderMode::DirectOnly(provider) => {
                provider.generate_response(prompt, caller_id).await
            }
            ProviderMode::DelegationCapable { gateway, .. } => {
                gateway.generate_response(prompt, caller_id).await
            }
        }
    }

    pub async fn health_check(&self) -> HealthReport {
        match self {
            ProviderMode::DirectOnly(provider) => provider.health_check().await,
            ProviderMode::DelegationCapable { gateway, .. } => gateway.health_check().await,
        }
    }

    pub fn router(&self) -> Option<&TaskRouter> {
        match self {
            ProviderMode::DirectOnly(_) => None,
            ProviderMode::DelegationCapable { router, .. } => Some(router),
        }
    }
}

/// A message handed over by the persona layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub prompt: String,
    pub caller_id: String,
    pub persona: Persona,
}

impl InboundMessage {
    pub fn new(prompt: impl Into<String>, caller_id: impl Into<String>, persona: Persona) -> Self {
        Self {
            prompt: prompt.into(),
            caller_id: caller_id.into(),
            persona,
        }
    }
}

/// How a reply was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum ReplyRoute {
    Delegated {
        destination: Destination,
        agent: String,
    },
    Direct,
    Apology,
}

/// Text returned to the caller, ready for the conversation store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    #[serde(flatten)]
    pub route: ReplyRoute,
}

pub struct Orchestrator {
    mode: ProviderMode,
    /// Prefix delegated replies with the destination label
    annotate_replies: bool,
    events: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(mode: ProviderMode, events: Arc<dyn EventSink>) -> Self {
        Self {
            mode,
            annotate_replies: false,
            events,
        }
    }

    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate_replies = annotate;
        self
    }

    /// Resolve the provider mode from `config` and build the orchestrator.
    pub fn from_config(
        config: &RelayConfig,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        let mode = create_mode(config, Arc::clone(&events))?;
        Ok(Self::new(mode, events).with_annotations(config.gateway.annotate_replies))
    }

    pub fn mode(&self) -> &ProviderMode {
        &self.mode
    }

    pub async fn health(&self) -> HealthReport {
        self.mode.health_check().await
    }

    /// Answer `message`, degrading through the fallback tiers.
    pub async fn handle(&self, message: &InboundMessage) -> Reply {
        if let ProviderMode::DelegationCapable { gateway, router } = &self.mode {
            match self.delegate(gateway.as_ref(), router, message).await {
                Ok(result) => return self.delegated_reply(router, result),
                Err(e) => {
                    tracing::warn!(
                        caller_id = %message.caller_id,
                        error = %e,
                        "Delegation failed"
                    );
                    self.events.emit(&GatewayEvent::FallbackEngaged {
                        tier: FallbackTier::DirectGeneration,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let prompt = message.persona.augment(&message.prompt);
        match self
            .mode
            .generate_response(&prompt, &message.caller_id)
            .await
        {
            Ok(text) => Reply {
                text,
                route: ReplyRoute::Direct,
            },
            Err(e) => {
                tracing::error!(
                    caller_id = %message.caller_id,
                    provider = %self.mode.provider_name(),
                    error = %e,
                    "Direct generation failed"
                );
                self.apologize(message, e.to_string())
            }
        }
    }

    /// [`Orchestrator::handle`] bounded by `deadline`.
    ///
    /// Expiry abandons whichever tier is in flight and answers with the
    /// persona's apology.
    pub async fn handle_within(&self, message: &InboundMessage, deadline: Duration) -> Reply {
        match tokio::time::timeout(deadline, self.handle(message)).await {
            Ok(reply) => reply,
            Err(_) => {
                tracing::error!(
                    caller_id = %message.caller_id,
                    deadline_ms = deadline.as_millis() as u64,
                    "Message deadline exceeded"
                );
                self.apologize(message, format!("request deadline of {:?} exceeded", deadline))
            }
        }
    }

    fn apologize(&self, message: &InboundMessage, reason: String) -> Reply {
        self.events.emit(&GatewayEvent::FallbackEngaged {
            tier: FallbackTier::Apology,
            reason,
        });
        Reply {
            text: message.persona.tone.apology().to_string(),
            route: ReplyRoute::Apology,
        }
    }

    async fn delegate(
        &self,
        gateway: &dyn DelegationGateway,
        router: &TaskRouter,
        message: &InboundMessage,
    ) -> Result<DelegationResult, GatewayError> {
        let destination = router.classify(&message.prompt).await;
        let request = DelegationRequest::new(
            message.prompt.clone(),
            message.caller_id.clone(),
            destination,
        );
        gateway.delegate_to_agent(&request).await
    }

    fn delegated_reply(&self, router: &TaskRouter, result: DelegationResult) -> Reply {
        let text = match router.table().label_for(result.destination) {
            Some(label) if self.annotate_replies => format!("[{}] {}", label, result.response),
            _ => result.response,
        };
        Reply {
            text,
            route: ReplyRoute::Delegated {
                destination: result.destination,
                agent: result.agent,
            },
        }
    }
}
