//! Relay - Agent delegation gateway
//!
//! This library routes chat messages to remote specialist agents behind an
//! OpenAI-compatible gateway, retrying transient failures and degrading to
//! direct generation or a persona-toned apology when delegation is not
//! possible.

pub mod agent;
pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod routing;
