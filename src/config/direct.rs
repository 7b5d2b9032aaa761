//! Direct LLM provider configuration

use serde::{Deserialize, Serialize};

/// A plain OpenAI-compatible API answering without delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub url: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_name() -> String {
    "direct".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl DirectConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Some(key.to_string());
        }
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
