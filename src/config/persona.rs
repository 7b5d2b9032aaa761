//! Persona configuration

use serde::{Deserialize, Serialize};

/// Default persona applied when a request carries none of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Tone name: "friendly", "professional" or anything else for neutral
    pub tone: String,
    /// Prepended to the prompt on direct generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            tone: "neutral".to_string(),
            preamble: None,
        }
    }
}
