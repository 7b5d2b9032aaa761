//! Shared test utilities for Relay integration tests.
//!
//! Provides a wiremock-backed gateway and builders for clients, configs and
//! orchestrators pointed at it.

#![allow(dead_code)]

use relay::agent::factory::create_mode_with_client;
use relay::agent::{GatewayClient, RetryPolicy};
use relay::config::{GatewayConfig, RelayConfig, RetryConfig};
use relay::logging::EventSink;
use relay::orchestrator::ProviderMode;
use relay::routing::DestinationTable;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const TOKEN: &str = "test-token";

/// Wire model ids with the default namespace
pub const CLASSIFIER_MODEL: &str = "openclaw:router";
pub const DEFAULT_MODEL: &str = "openclaw:main";
pub const CODER_MODEL: &str = "openclaw:coder";

/// Backoff used throughout: 10ms, 20ms, 40ms, 40ms, ...
pub const BASE_DELAY_MS: u64 = 10;
pub const MAX_DELAY_MS: u64 = 40;

// =============================================================================
// Config Builders
// =============================================================================

pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(BASE_DELAY_MS),
        max_delay: Duration::from_millis(MAX_DELAY_MS),
    }
}

pub fn gateway_config(url: &str) -> GatewayConfig {
    GatewayConfig {
        url: Some(url.to_string()),
        token: Some(TOKEN.to_string()),
        request_timeout_seconds: 5,
        probe_timeout_seconds: 2,
        classification_timeout_seconds: 2,
        ..Default::default()
    }
}

pub fn relay_config(url: &str, max_attempts: u32) -> RelayConfig {
    RelayConfig {
        gateway: gateway_config(url),
        retry: RetryConfig {
            max_attempts,
            base_delay_ms: BASE_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
        },
        ..Default::default()
    }
}

pub fn gateway_client(url: &str, max_attempts: u32, events: Arc<dyn EventSink>) -> GatewayClient {
    GatewayClient::new(
        url.to_string(),
        &gateway_config(url),
        fast_policy(max_attempts),
        Arc::new(DestinationTable::default()),
        Arc::new(reqwest::Client::new()),
        events,
    )
}

pub fn delegation_mode(url: &str, max_attempts: u32, events: Arc<dyn EventSink>) -> ProviderMode {
    create_mode_with_client(
        &relay_config(url, max_attempts),
        Arc::new(reqwest::Client::new()),
        events,
    )
    .unwrap()
}

/// A port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

// =============================================================================
// Mock Gateway
// =============================================================================

/// Chat-completion body with one choice.
pub fn chat_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

pub async fn mount_models(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"data": []})))
        .mount(server)
        .await;
}

/// Answer chat completions addressed to `model`.
pub fn chat_for(model: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": model})))
}

pub async fn mount_classifier_reply(server: &MockServer, reply: &str) {
    chat_for(CLASSIFIER_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(reply)))
        .mount(server)
        .await;
}

/// JSON bodies of every chat-completion POST received, in order.
pub async fn chat_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Chat-completion POSTs addressed to `model`.
pub async fn chat_requests_for(server: &MockServer, model: &str) -> Vec<Value> {
    chat_requests(server)
        .await
        .into_iter()
        .filter(|body| body["model"] == model)
        .collect()
}
