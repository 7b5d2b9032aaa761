//! Ask and route command implementations

use crate::cli::output::{format_reply_pretty, format_route_table};
use crate::cli::{load_config, AskArgs, RouteArgs};
use crate::config::LoggingConfig;
use crate::logging::{init_tracing, TracingSink};
use crate::orchestrator::{InboundMessage, Orchestrator, Persona, Tone};
use serde_json::json;
use std::sync::Arc;

/// Route retry and fallback events to stderr for one-shot commands.
///
/// A subscriber installed earlier in the process is kept.
fn init_command_tracing(config: &LoggingConfig) {
    if let Err(e) = init_tracing(config) {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}

/// Handle `relay ask`: one message through the full fallback chain.
pub async fn handle_ask(args: &AskArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    init_command_tracing(&config.logging);
    let orchestrator = Orchestrator::from_config(&config, Arc::new(TracingSink))?;

    let mut persona = Persona::from(&config.persona);
    if let Some(tone) = args.tone.as_deref() {
        persona.tone = Tone::parse(tone);
    }

    let message = InboundMessage::new(args.message.clone(), args.caller.clone(), persona);
    let reply = orchestrator.handle(&message).await;

    if args.json {
        Ok(serde_json::to_string_pretty(&reply)?)
    } else {
        Ok(format_reply_pretty(&reply))
    }
}

/// Handle `relay route`: classify only, nothing is delegated.
pub async fn handle_route(args: &RouteArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    init_command_tracing(&config.logging);
    let orchestrator = Orchestrator::from_config(&config, Arc::new(TracingSink))?;

    let router = orchestrator
        .mode()
        .router()
        .ok_or("Routing requires a delegation-capable gateway; set [gateway].url")?;

    let destination = router.classify(&args.message).await;
    let table = router.table();

    if args.json {
        Ok(serde_json::to_string_pretty(&json!({
            "destination": destination,
            "agent": table.agent_for(destination),
            "label": table.label_for(destination),
        }))?)
    } else {
        Ok(format_route_table(table, destination))
    }
}
