//! `[logging]` section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// Modules that accept a level of their own under `component_levels`.
pub const COMPONENTS: &[&str] = &["agent", "api", "cli", "orchestrator", "routing"];

/// Subscriber output: `pretty` on a terminal, `json` behind a log shipper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(format!("expected 'pretty' or 'json', got '{}'", s))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level for everything not named in `component_levels`
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels, e.g. `{ routing = "debug" }` to see classifier replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<BTreeMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}

impl LoggingConfig {
    /// First malformed entry as `(field, message)`, if any.
    ///
    /// Levels are anything `LevelFilter` parses, `off` included.
    pub fn invalid_entry(&self) -> Option<(String, String)> {
        if self.level.parse::<LevelFilter>().is_err() {
            return Some((
                "logging.level".to_string(),
                format!("unknown level '{}'", self.level),
            ));
        }

        for (component, level) in self.component_levels.iter().flatten() {
            let field = format!("logging.component_levels.{}", component);
            if !COMPONENTS.contains(&component.as_str()) {
                return Some((
                    field,
                    format!("unknown component, expected one of {}", COMPONENTS.join(", ")),
                ));
            }
            if level.parse::<LevelFilter>().is_err() {
                return Some((field, format!("unknown level '{}'", level)));
            }
        }

        None
    }
}
