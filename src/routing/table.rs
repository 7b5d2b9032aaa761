//! Destination lookup table.

use crate::agent::Destination;
use crate::config::{default_destinations, ConfigError, DestinationProfile};
use std::collections::BTreeMap;

/// Per-destination agent identity and display label.
///
/// Built once from configuration; adding a specialist is a table entry,
/// not a control-flow change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationTable {
    entries: BTreeMap<Destination, DestinationProfile>,
}

impl DestinationTable {
    /// Built-in profiles with `overrides` merged on top.
    pub fn from_config(
        overrides: &BTreeMap<String, DestinationProfile>,
    ) -> Result<Self, ConfigError> {
        let mut table = Self::default();
        for (name, profile) in overrides {
            let destination = name.parse::<Destination>().map_err(|e| {
                ConfigError::Validation {
                    field: format!("destinations.{}", name),
                    message: e,
                }
            })?;
            table.entries.insert(destination, profile.clone());
        }
        Ok(table)
    }

    pub fn get(&self, destination: Destination) -> Option<&DestinationProfile> {
        self.entries.get(&destination)
    }

    pub fn contains(&self, destination: Destination) -> bool {
        self.entries.contains_key(&destination)
    }

    pub fn agent_for(&self, destination: Destination) -> Option<&str> {
        self.get(destination).map(|p| p.agent.as_str())
    }

    pub fn label_for(&self, destination: Destination) -> Option<&str> {
        self.get(destination).map(|p| p.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Destination, &DestinationProfile)> {
        self.entries.iter().map(|(d, p)| (*d, p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DestinationTable {
    fn default() -> Self {
        let entries = default_destinations()
            .into_iter()
            .filter_map(|(name, profile)| {
                name.parse::<Destination>().ok().map(|d| (d, profile))
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_destination() {
        let table = DestinationTable::default();
        for destination in Destination::ALL {
            assert!(table.contains(destination), "missing {}", destination);
        }
        assert_eq!(table.agent_for(Destination::General), Some("main"));
        assert_eq!(
            table.label_for(Destination::PersonalAssistant),
            Some("Personal Assistant")
        );
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "coder".to_string(),
            DestinationProfile::new("senior-dev", "Senior Dev", "hard code problems"),
        );

        let table = DestinationTable::from_config(&overrides).unwrap();
        assert_eq!(table.agent_for(Destination::Coder), Some("senior-dev"));
        assert_eq!(table.agent_for(Destination::Marketing), Some("marketing"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_unknown_override_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "sales".to_string(),
            DestinationProfile::new("sales", "Sales", "deals"),
        );

        let result = DestinationTable::from_config(&overrides);
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "destinations.sales"
        ));
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let table = DestinationTable::default();
        let order: Vec<_> = table.iter().map(|(d, _)| d).collect();
        assert_eq!(order, Destination::ALL.to_vec());
    }
}
