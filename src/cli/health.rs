//! Health command implementation

use crate::cli::output::{format_health_table, HealthView};
use crate::cli::{load_config, HealthArgs};
use crate::logging::TracingSink;
use crate::orchestrator::Orchestrator;
use std::sync::Arc;

/// Render a health view in the requested format.
pub fn render_health(view: &HealthView, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        Ok(serde_json::to_string_pretty(view)?)
    } else {
        Ok(format_health_table(view))
    }
}

/// Handle `relay health`: one unretried check of the active provider.
pub async fn handle_health(args: &HealthArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let orchestrator = Orchestrator::from_config(&config, Arc::new(TracingSink))?;

    let mode = orchestrator.mode();
    let report = orchestrator.health().await;
    let view = HealthView::new(mode.label(), mode.provider_name(), report);

    render_health(&view, args.json)
}
