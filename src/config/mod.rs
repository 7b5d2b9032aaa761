//! Configuration module for Relay
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`RELAY_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use relay::config::RelayConfig;
//!
//! let toml = r#"
//! [gateway]
//! url = "http://vps.internal:18789"
//! token_env = "GATEWAY_TOKEN"
//!
//! [retry]
//! max_attempts = 2
//! "#;
//! let config: RelayConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.retry.max_attempts, 2);
//! assert_eq!(config.gateway.default_agent, "main");
//! ```

pub mod destinations;
pub mod direct;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod persona;
pub mod retry;
pub mod server;

pub use destinations::{default_destinations, DestinationProfile};
pub use direct::DirectConfig;
pub use error::ConfigError;
pub use gateway::GatewayConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use persona::PersonaConfig;
pub use retry::RetryConfig;
pub use server::ServerConfig;

use crate::agent::Destination;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Unified configuration for the Relay gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// HTTP surface configuration
    pub server: ServerConfig,
    /// Remote multi-agent gateway
    pub gateway: GatewayConfig,
    /// Backoff for every gateway call
    pub retry: RetryConfig,
    /// Direct provider used when no gateway is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<DirectConfig>,
    /// Default persona
    pub persona: PersonaConfig,
    /// Destination overrides, merged over the built-in table
    pub destinations: BTreeMap<String, DestinationProfile>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            retry: RetryConfig::default(),
            direct: None,
            persona: PersonaConfig::default(),
            destinations: default_destinations(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports RELAY_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("RELAY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("RELAY_HOST") {
            self.server.host = host;
        }

        if let Ok(url) = std::env::var("RELAY_GATEWAY_URL") {
            if !url.trim().is_empty() {
                self.gateway.url = Some(url);
            }
        }
        if let Ok(token) = std::env::var("RELAY_GATEWAY_TOKEN") {
            self.gateway.token = Some(token);
        }

        if let Ok(tone) = std::env::var("RELAY_TONE") {
            self.persona.tone = tone;
        }

        if let Ok(level) = std::env::var("RELAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RELAY_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(validation("server.port", "port must be non-zero"));
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(validation(
                "retry.base_delay_ms",
                "base delay cannot exceed retry.max_delay_ms",
            ));
        }

        if let Some(url) = &self.gateway.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(validation(
                    "gateway.url",
                    "URL must start with http:// or https://",
                ));
            }
        }
        for (field, value) in [
            (
                "server.request_timeout_seconds",
                self.server.request_timeout_seconds,
            ),
            (
                "gateway.request_timeout_seconds",
                self.gateway.request_timeout_seconds,
            ),
            (
                "gateway.probe_timeout_seconds",
                self.gateway.probe_timeout_seconds,
            ),
            (
                "gateway.classification_timeout_seconds",
                self.gateway.classification_timeout_seconds,
            ),
        ] {
            if value == 0 {
                return Err(validation(field, "timeout must be non-zero"));
            }
        }
        if self.gateway.namespace.is_empty() {
            return Err(validation("gateway.namespace", "namespace cannot be empty"));
        }

        if let Some(direct) = &self.direct {
            if direct.url.is_empty() {
                return Err(validation("direct.url", "URL cannot be empty"));
            }
            if direct.model.is_empty() {
                return Err(validation("direct.model", "model cannot be empty"));
            }
        }

        for (name, profile) in &self.destinations {
            if name.parse::<Destination>().is_err() {
                return Err(validation(
                    &format!("destinations.{}", name),
                    "unknown destination",
                ));
            }
            if profile.agent.trim().is_empty() {
                return Err(validation(
                    &format!("destinations.{}.agent", name),
                    "agent identity cannot be empty",
                ));
            }
        }

        if let Some((field, message)) = self.logging.invalid_entry() {
            return Err(validation(&field, &message));
        }

        Ok(())
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
