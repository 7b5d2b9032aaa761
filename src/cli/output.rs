//! Output formatting helpers for CLI commands

use crate::agent::{ConnectionProbeResult, HealthReport};
use crate::orchestrator::{Reply, ReplyRoute};
use crate::routing::DestinationTable;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

/// View model for health display
#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub status: String,
    pub mode: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthView {
    pub fn new(mode: &str, provider: &str, report: HealthReport) -> Self {
        Self {
            status: if report.healthy { "healthy" } else { "unhealthy" }.to_string(),
            mode: mode.to_string(),
            provider: provider.to_string(),
            latency_ms: report.latency_ms,
            error: report.error,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// View model for a probe result
#[derive(Debug, Clone, Serialize)]
pub struct ProbeView {
    pub url: String,
    pub reachable: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeView {
    pub fn new(url: &str, result: ConnectionProbeResult) -> Self {
        Self {
            url: url.to_string(),
            reachable: result.reachable,
            latency_ms: result.latency_ms(),
            error: result.error,
        }
    }
}

/// Format a health view as a table
pub fn format_health_table(view: &HealthView) -> String {
    let status = if view.is_healthy() {
        "Healthy".green().to_string()
    } else {
        "Unhealthy".red().to_string()
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Provider", "Mode", "Status", "Latency", "Error"]);
    table.add_row(vec![
        Cell::new(&view.provider),
        Cell::new(&view.mode),
        Cell::new(status),
        Cell::new(
            view.latency_ms
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_else(|| "-".to_string()),
        ),
        Cell::new(view.error.as_deref().unwrap_or("-")),
    ]);

    table.to_string()
}

/// Format a probe view as one status line
pub fn format_probe_line(view: &ProbeView) -> String {
    if view.reachable {
        format!(
            "{} {} reachable ({}ms)",
            "✓".green(),
            view.url,
            view.latency_ms
        )
    } else {
        format!(
            "{} {} unreachable after {}ms: {}",
            "✗".red(),
            view.url,
            view.latency_ms,
            view.error.as_deref().unwrap_or("no response")
        )
    }
}

/// Format the destination table with the chosen row highlighted
pub fn format_route_table(table: &DestinationTable, chosen: crate::agent::Destination) -> String {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["", "Destination", "Agent", "Label"]);

    for (destination, profile) in table.iter() {
        let marker = if destination == chosen {
            "→".green().to_string()
        } else {
            String::new()
        };
        out.add_row(vec![
            Cell::new(marker),
            Cell::new(destination),
            Cell::new(&profile.agent),
            Cell::new(&profile.label),
        ]);
    }

    out.to_string()
}

/// Format a reply for the terminal: text, then a dimmed route note
pub fn format_reply_pretty(reply: &Reply) -> String {
    let note = match &reply.route {
        ReplyRoute::Delegated { destination, agent } => {
            format!("delegated to {} ({})", destination, agent)
        }
        ReplyRoute::Direct => "direct generation".to_string(),
        ReplyRoute::Apology => "all providers failed".to_string(),
    };
    format!("{}\n\n{}", reply.text, format!("({})", note).dimmed())
}
