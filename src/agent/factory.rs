//! Provider factory: resolve the capability mode once from configuration.

use super::{DirectProvider, GatewayClient, RetryPolicy};
use crate::config::{ConfigError, RelayConfig};
use crate::logging::EventSink;
use crate::orchestrator::ProviderMode;
use crate::routing::{DestinationTable, TaskRouter};
use reqwest::Client;
use std::sync::Arc;

/// Idle connections kept per host by the shared client.
const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Build the shared HTTP client used by every provider.
///
/// Deadlines are applied per request, so the client itself carries none.
pub fn build_http_client() -> Result<Arc<Client>, ConfigError> {
    Client::builder()
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .build()
        .map(Arc::new)
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Resolve [`ProviderMode`] from configuration.
///
/// A gateway URL makes the mode delegation-capable; otherwise a `[direct]`
/// provider makes it direct-only. With neither configured this fails with
/// `ConfigError::MissingField("gateway.url")`.
///
/// # Examples
///
/// ```
/// use relay::agent::factory::create_mode;
/// use relay::config::RelayConfig;
/// use relay::logging::TracingSink;
/// use std::sync::Arc;
///
/// let mut config = RelayConfig::default();
/// config.gateway.url = Some("http://127.0.0.1:18789".to_string());
///
/// let mode = create_mode(&config, Arc::new(TracingSink)).unwrap();
/// assert!(mode.is_delegation_capable());
/// ```
pub fn create_mode(
    config: &RelayConfig,
    events: Arc<dyn EventSink>,
) -> Result<ProviderMode, ConfigError> {
    let client = build_http_client()?;
    create_mode_with_client(config, client, events)
}

/// As [`create_mode`], reusing an existing HTTP client.
pub fn create_mode_with_client(
    config: &RelayConfig,
    client: Arc<Client>,
    events: Arc<dyn EventSink>,
) -> Result<ProviderMode, ConfigError> {
    let policy = RetryPolicy::from(&config.retry);
    let table = Arc::new(DestinationTable::from_config(&config.destinations)?);

    if let Some(url) = config.gateway.url.as_deref().filter(|u| !u.trim().is_empty()) {
        if config.direct.is_some() {
            tracing::warn!("Both [gateway] and [direct] are configured; [direct] is ignored");
        }

        let gateway = Arc::new(GatewayClient::new(
            url.to_string(),
            &config.gateway,
            policy,
            Arc::clone(&table),
            client,
            events,
        ));
        let router = TaskRouter::new(gateway.clone(), table);

        tracing::info!(
            gateway = %gateway.base_url(),
            max_attempts = policy.max_attempts,
            "Delegation-capable mode"
        );
        return Ok(ProviderMode::DelegationCapable { gateway, router });
    }

    if let Some(direct) = &config.direct {
        let provider = DirectProvider::new(direct, policy, client, events);
        tracing::info!(
            provider = %direct.name,
            model = %direct.model,
            "Direct-only mode"
        );
        return Ok(ProviderMode::DirectOnly(Arc::new(provider)));
    }

    Err(ConfigError::MissingField("gateway.url".to_string()))
}
