//! Remote agent gateway configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the OpenAI-compatible multi-agent gateway.
///
/// Leaving `url` unset disables delegation entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub url: Option<String>,
    /// Bearer token; takes precedence over `token_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Name of the environment variable holding the bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    /// Prefix of every model id: `<namespace>:<agent>`
    pub namespace: String,
    /// Agent answering plain (non-delegated) generation
    pub default_agent: String,
    /// Cheap, fast agent used for routing classification
    pub classifier_agent: String,
    pub request_timeout_seconds: u64,
    pub probe_timeout_seconds: u64,
    pub classification_timeout_seconds: u64,
    /// Prefix delegated replies with the destination's display label
    pub annotate_replies: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            token_env: None,
            namespace: "openclaw".to_string(),
            default_agent: "main".to_string(),
            classifier_agent: "router".to_string(),
            request_timeout_seconds: 120,
            probe_timeout_seconds: 10,
            classification_timeout_seconds: 15,
            annotate_replies: false,
        }
    }
}

impl GatewayConfig {
    /// Resolve the bearer token from `token` or `token_env`.
    ///
    /// Returns `None` when neither yields a non-empty value; the client reports
    /// that as a configuration error on first use.
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Some(token.to_string());
        }
        self.token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|t| !t.trim().is_empty())
    }
}
