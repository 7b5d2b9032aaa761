//! Destination table configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How one destination is addressed and presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationProfile {
    /// Remote agent identity (`<namespace>:<agent>` on the wire)
    pub agent: String,
    /// Display label shown when replies are annotated
    pub label: String,
    /// One-line capability summary fed to the classifier
    pub description: String,
}

impl DestinationProfile {
    pub fn new(agent: &str, label: &str, description: &str) -> Self {
        Self {
            agent: agent.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Built-in profiles keyed by destination name.
pub fn default_destinations() -> BTreeMap<String, DestinationProfile> {
    BTreeMap::from([
        (
            "general".to_string(),
            DestinationProfile::new(
                "main",
                "Assistant",
                "general conversation, questions and anything that fits no other destination",
            ),
        ),
        (
            "coder".to_string(),
            DestinationProfile::new(
                "coder",
                "Coder",
                "programming, debugging, code review and software architecture",
            ),
        ),
        (
            "marketing".to_string(),
            DestinationProfile::new(
                "marketing",
                "Marketing",
                "copywriting, campaigns, branding, social media and growth",
            ),
        ),
        (
            "personal-assistant".to_string(),
            DestinationProfile::new(
                "assistant",
                "Personal Assistant",
                "scheduling, reminders, email drafting and personal organisation",
            ),
        ),
    ])
}
