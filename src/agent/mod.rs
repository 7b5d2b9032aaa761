//! Response providers and the remote agent gateway client.
//!
//! This module provides the provider traits the orchestrator is written
//! against, the OpenAI-compatible wire codec, and the failure machinery
//! (classification, probing, retry) every outbound call goes through.

use async_trait::async_trait;

pub mod direct;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod probe;
pub mod retry;
pub mod types;
pub mod wire;

// Re-export key types for convenience
pub use direct::DirectProvider;
pub use error::{classify, describe, FailureCategory, GatewayError};
pub use gateway::GatewayClient;
pub use probe::ConnectionProber;
pub use retry::{RetryExecutor, RetryPolicy};
pub use types::{
    ConnectionProbeResult, DelegationRequest, DelegationResult, Destination, HealthReport,
};

/// Anything that can answer a prompt with a single chat turn.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn ResponseProvider>`.
#[async_trait]
pub trait ResponseProvider: Send + Sync + 'static {
    /// Human-readable name for logging (e.g., "gateway", "openai").
    fn name(&self) -> &str;

    /// Generate a reply to `prompt` on behalf of `caller_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` with the first choice's content
    /// - `Err(GatewayError::Configuration)` if no credential is configured
    /// - `Err(GatewayError::Operation)` once retries are exhausted or the
    ///   failure is not retryable
    async fn generate_response(&self, prompt: &str, caller_id: &str)
        -> Result<String, GatewayError>;

    /// Cheap, non-retried check that the provider can currently answer.
    async fn health_check(&self) -> HealthReport;
}

/// A provider that can also hand requests to named specialist agents.
#[async_trait]
pub trait DelegationGateway: ResponseProvider {
    /// Probe, then forward `request` to its destination's agent.
    ///
    /// An unreachable probe fails with `GatewayError::Unreachable` without
    /// sending any chat request.
    async fn delegate_to_agent(
        &self,
        request: &DelegationRequest,
    ) -> Result<DelegationResult, GatewayError>;
}

/// Backend for the single low-token classification round-trip.
#[async_trait]
pub trait ClassificationBackend: Send + Sync + 'static {
    /// Send `instructions` as the system turn and `message` as the user turn,
    /// returning the raw reply text.
    async fn classify_completion(
        &self,
        instructions: &str,
        message: &str,
    ) -> Result<String, GatewayError>;
}
