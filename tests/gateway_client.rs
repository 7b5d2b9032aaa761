//! Integration tests for the gateway client against a mock gateway.
//!
//! Covers the wire shape, the probe gate in front of delegation and the
//! one-POST-per-attempt retry behaviour.

mod common;

use common::*;
use relay::agent::{
    DelegationGateway, DelegationRequest, Destination, FailureCategory, GatewayError,
    ResponseProvider,
};
use relay::logging::{MemorySink, TracingSink};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coder_request() -> DelegationRequest {
    DelegationRequest::new("Why does the borrow checker hate me?", "user-42", Destination::Coder)
}

#[tokio::test]
async fn test_delegation_wire_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    chat_for(CODER_MODEL)
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Use a scoped borrow.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = gateway_client(&server.uri(), 3, Arc::new(TracingSink));
    let result = client.delegate_to_agent(&coder_request()).await.unwrap();

    assert_eq!(result.destination, Destination::Coder);
    assert_eq!(result.agent, "coder");
    assert_eq!(result.response, "Use a scoped borrow.");

    let bodies = chat_requests(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Why does the borrow checker hate me?"
    );
    let tag = body["user"].as_str().unwrap();
    assert!(tag.starts_with("delegate-coder-"), "unexpected tag {}", tag);

    server.verify().await;
}

#[tokio::test]
async fn test_one_post_per_attempt_after_reachable_probe() {
    let server = MockServer::start().await;
    mount_models(&server, 200).await;
    chat_for(CODER_MODEL)
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = gateway_client(&server.uri(), 2, sink.clone());
    let err = client.delegate_to_agent(&coder_request()).await.unwrap_err();

    match err {
        GatewayError::Operation {
            attempts, category, ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(category, FailureCategory::RemoteHttpError(503));
        }
        other => panic!("Expected Operation error, got {:?}", other),
    }
    assert_eq!(
        sink.retry_delays(),
        vec![Duration::from_millis(10), Duration::from_millis(20)]
    );

    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_probe_sends_no_post() {
    let server = MockServer::start().await;
    mount_models(&server, 503).await;
    chat_for(CODER_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("never")))
        .expect(0)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = gateway_client(&server.uri(), 3, sink.clone());
    let err = client.delegate_to_agent(&coder_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Unreachable { .. }));
    assert!(err.to_string().contains("VPS unreachable"));
    assert!(sink.retry_delays().is_empty());
    assert!(chat_requests(&server).await.is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_connection_refused_fails_fast() {
    let sink = Arc::new(MemorySink::new());
    let client = gateway_client(&closed_port_url(), 3, sink.clone());

    let err = client.delegate_to_agent(&coder_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Unreachable { .. }));
    assert!(sink.retry_delays().is_empty());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    mount_models(&server, 200).await;
    chat_for(DEFAULT_MODEL)
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = gateway_client(&server.uri(), 3, sink.clone());
    let err = client.generate_response("hello", "user-1").await.unwrap_err();

    match err {
        GatewayError::Operation {
            attempts,
            category,
            ref message,
            ..
        } => {
            assert_eq!(attempts, 1);
            assert_eq!(category, FailureCategory::RemoteHttpError(400));
            assert!(message.contains("rejected"));
        }
        other => panic!("Expected Operation error, got {:?}", other),
    }
    assert!(sink.retry_delays().is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_empty_choices_is_agent_error() {
    let server = MockServer::start().await;
    chat_for(DEFAULT_MODEL)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = gateway_client(&server.uri(), 3, Arc::new(TracingSink));
    let err = client.generate_response("hello", "user-1").await.unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Operation {
            category: FailureCategory::AgentLevelError,
            attempts: 1,
            ..
        }
    ));

    server.verify().await;
}

#[tokio::test]
async fn test_generate_sends_caller_as_user() {
    let server = MockServer::start().await;
    chat_for(DEFAULT_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Hi Alice!")))
        .mount(&server)
        .await;

    let client = gateway_client(&server.uri(), 0, Arc::new(TracingSink));
    let reply = client.generate_response("hello", "alice").await.unwrap();

    assert_eq!(reply, "Hi Alice!");
    let bodies = chat_requests_for(&server, DEFAULT_MODEL).await;
    assert_eq!(bodies[0]["user"], "alice");
}

#[tokio::test]
async fn test_timeout_is_retried_then_reported() {
    let server = MockServer::start().await;
    let mut config = gateway_config(&server.uri());
    config.request_timeout_seconds = 1;

    chat_for(DEFAULT_MODEL)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let sink = Arc::new(MemorySink::new());
    let client = relay::agent::GatewayClient::new(
        server.uri(),
        &config,
        fast_policy(1),
        Arc::new(relay::routing::DestinationTable::default()),
        Arc::new(reqwest::Client::new()),
        sink.clone(),
    );

    let err = client.generate_response("hello", "user-1").await.unwrap_err();

    match err {
        GatewayError::Operation {
            category,
            attempts,
            ref message,
            ..
        } => {
            assert_eq!(category, FailureCategory::Timeout);
            assert_eq!(attempts, 2);
            assert!(message.contains("timeout"));
        }
        other => panic!("Expected Operation error, got {:?}", other),
    }
    assert_eq!(sink.retry_delays().len(), 1);
}

#[tokio::test]
async fn test_health_check_healthy() {
    let server = MockServer::start().await;
    mount_models(&server, 200).await;
    chat_for(DEFAULT_MODEL)
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("pong")))
        .expect(1)
        .mount(&server)
        .await;

    let client = gateway_client(&server.uri(), 3, Arc::new(TracingSink));
    let report = client.health_check().await;

    assert!(report.healthy);
    assert!(report.latency_ms.is_some());
    let bodies = chat_requests(&server).await;
    assert_eq!(bodies[0]["max_tokens"], 5);

    server.verify().await;
}

#[tokio::test]
async fn test_health_check_round_trip_failure_not_retried() {
    let server = MockServer::start().await;
    mount_models(&server, 200).await;
    chat_for(DEFAULT_MODEL)
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = gateway_client(&server.uri(), 3, Arc::new(TracingSink));
    let report = client.health_check().await;

    assert!(!report.healthy);
    assert!(report.error.unwrap().contains("500"));

    server.verify().await;
}

#[tokio::test]
async fn test_health_check_probe_failure() {
    let client = gateway_client(&closed_port_url(), 3, Arc::new(TracingSink));
    let report = client.health_check().await;

    assert!(!report.healthy);
    assert!(report.error.is_some());
}
