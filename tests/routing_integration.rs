//! Task router against a mock classification agent.

mod common;

use common::*;
use relay::agent::Destination;
use relay::logging::TracingSink;
use relay::routing::{DestinationTable, TaskRouter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::{MockServer, ResponseTemplate};

fn router_for(server: &MockServer) -> TaskRouter {
    let client = Arc::new(gateway_client(&server.uri(), 3, Arc::new(TracingSink)));
    TaskRouter::new(client, Arc::new(DestinationTable::default()))
}

#[tokio::test]
async fn test_router_parses_noisy_reply() {
    let server = MockServer::start().await;
    mount_classifier_reply(&server, "  Marketing.\n").await;

    let router = router_for(&server);
    assert_eq!(
        router.classify("Write a launch tweet for our app").await,
        Destination::Marketing
    );

    let bodies = chat_requests_for(&server, CLASSIFIER_MODEL).await;
    assert_eq!(bodies.len(), 1);
    let messages = bodies[0]["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .contains("personal-assistant"));
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(bodies[0]["max_tokens"], 16);
}

#[tokio::test]
async fn test_router_out_of_vocabulary_is_general() {
    let server = MockServer::start().await;
    mount_classifier_reply(&server, "banana").await;

    let router = router_for(&server);
    assert_eq!(router.classify("hello").await, Destination::General);
}

#[tokio::test]
async fn test_router_server_error_is_general_without_retry() {
    let server = MockServer::start().await;
    chat_for(CLASSIFIER_MODEL)
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let router = router_for(&server);
    assert_eq!(router.classify("hello").await, Destination::General);

    server.verify().await;
}

#[tokio::test]
async fn test_router_unreachable_backend_is_general_immediately() {
    let client = Arc::new(gateway_client(&closed_port_url(), 3, Arc::new(TracingSink)));
    let router = TaskRouter::new(client, Arc::new(DestinationTable::default()));

    let start = Instant::now();
    assert_eq!(router.classify("hello").await, Destination::General);
    assert!(start.elapsed() < Duration::from_secs(2));
}
