//! Probe command implementation

use crate::agent::factory::build_http_client;
use crate::agent::ConnectionProber;
use crate::cli::output::{format_probe_line, ProbeView};
use crate::cli::{load_config, ProbeArgs};
use std::time::Duration;

/// Handle `relay probe`: one GET /v1/models against the gateway, no retry.
pub async fn handle_probe(args: &ProbeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;

    let url = args
        .url
        .clone()
        .or_else(|| config.gateway.url.clone())
        .ok_or("No gateway URL; pass --url or set [gateway].url")?;

    let prober = ConnectionProber::new(
        build_http_client()?,
        Duration::from_secs(config.gateway.probe_timeout_seconds),
    );
    let token = config.gateway.resolve_token();
    let result = prober.probe(&url, token.as_deref()).await;
    let view = ProbeView::new(&url, result);

    if args.json {
        Ok(serde_json::to_string_pretty(&view)?)
    } else {
        Ok(format_probe_line(&view))
    }
}
