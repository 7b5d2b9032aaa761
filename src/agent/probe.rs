//! Lightweight reachability probe, independent of the chat protocol.

use super::error::{describe, GatewayError};
use super::types::ConnectionProbeResult;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Deadline for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues one `GET /v1/models` per probe. Never retries.
#[derive(Clone)]
pub struct ConnectionProber {
    client: Arc<Client>,
    timeout: Duration,
}

impl ConnectionProber {
    pub fn new(client: Arc<Client>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Probe `base_url` and report reachability with the measured latency.
    ///
    /// Any non-2xx status counts as unreachable.
    pub async fn probe(&self, base_url: &str, auth_token: Option<&str>) -> ConnectionProbeResult {
        let url = format!("{}/v1/models", base_url.trim_end_matches('/'));
        let start = Instant::now();

        let mut request = self.client.get(&url).timeout(self.timeout);
        if let Some(token) = auth_token {
            request = request.header("authorization", format!("Bearer {}", token));
        }

        let outcome = request.send().await;
        let latency = start.elapsed();

        match outcome {
            Ok(response) if response.status().is_success() => ConnectionProbeResult {
                reachable: true,
                latency,
                error: None,
            },
            Ok(response) => ConnectionProbeResult {
                reachable: false,
                latency,
                error: Some(format!("HTTP {}", response.status().as_u16())),
            },
            Err(e) => ConnectionProbeResult {
                reachable: false,
                latency,
                error: Some(describe(&GatewayError::from_reqwest(e, self.timeout))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn prober() -> ConnectionProber {
        ConnectionProber::new(Arc::new(Client::new()), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_probe_reachable_with_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"openclaw:main"}]}"#)
            .create_async()
            .await;

        let result = prober().probe(&server.url(), Some("tok")).await;

        mock.assert_async().await;
        assert!(result.reachable);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_probe_trailing_slash_base_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .with_status(200)
            .create_async()
            .await;

        let result = prober().probe(&format!("{}/", server.url()), None).await;

        mock.assert_async().await;
        assert!(result.reachable);
    }

    #[tokio::test]
    async fn test_probe_http_error_is_unreachable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/models")
            .with_status(502)
            .create_async()
            .await;

        let result = prober().probe(&server.url(), Some("tok")).await;

        assert!(!result.reachable);
        assert_eq!(result.error.as_deref(), Some("HTTP 502"));
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        // Port 9 (discard) is closed on test hosts.
        let result = prober().probe("http://127.0.0.1:9", None).await;

        assert!(!result.reachable);
        let error = result.error.unwrap();
        assert!(error.contains("Check the gateway URL"), "got: {}", error);
    }
}
