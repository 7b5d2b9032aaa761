//! Supporting types for delegation and probing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Specialist identity a message can be routed to.
///
/// The set is closed; `General` is the fallback for anything ambiguous.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    #[default]
    General,
    Coder,
    Marketing,
    PersonalAssistant,
}

impl Destination {
    /// Every destination, in routing-instruction order.
    pub const ALL: [Destination; 4] = [
        Destination::General,
        Destination::Coder,
        Destination::Marketing,
        Destination::PersonalAssistant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::General => "general",
            Destination::Coder => "coder",
            Destination::Marketing => "marketing",
            Destination::PersonalAssistant => "personal-assistant",
        }
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Destination::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown destination: {}", s))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message to delegate, valid for a single request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    pub prompt: String,
    pub caller_id: String,
    pub destination: Destination,
}

impl DelegationRequest {
    pub fn new(
        prompt: impl Into<String>,
        caller_id: impl Into<String>,
        destination: Destination,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            caller_id: caller_id.into(),
            destination,
        }
    }
}

/// Successful specialist answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationResult {
    pub destination: Destination,
    /// Remote agent identity the destination resolved to.
    pub agent: String,
    pub response: String,
}

/// Outcome of a single reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProbeResult {
    pub reachable: bool,
    /// Wall-clock time of the probe, measured on success and failure alike.
    pub latency: Duration,
    pub error: Option<String>,
}

impl ConnectionProbeResult {
    pub fn latency_ms(&self) -> u64 {
        self.latency.as_millis() as u64
    }
}

/// Result of a provider health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            healthy: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            latency_ms: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_round_trips_through_str() {
        for destination in Destination::ALL {
            assert_eq!(destination.as_str().parse::<Destination>(), Ok(destination));
        }
    }

    #[test]
    fn test_destination_rejects_unknown() {
        assert!("banana".parse::<Destination>().is_err());
        assert!("Coder".parse::<Destination>().is_err());
    }

    #[test]
    fn test_destination_serde_is_kebab_case() {
        let json = serde_json::to_string(&Destination::PersonalAssistant).unwrap();
        assert_eq!(json, "\"personal-assistant\"");
    }

    #[test]
    fn test_default_destination_is_general() {
        assert_eq!(Destination::default(), Destination::General);
    }

    #[test]
    fn test_health_report_serialization_skips_empty_fields() {
        let json = serde_json::to_value(HealthReport::healthy(12)).unwrap();
        assert_eq!(json["healthy"], true);
        assert_eq!(json["latency_ms"], 12);
        assert!(json.get("error").is_none());
    }
}
