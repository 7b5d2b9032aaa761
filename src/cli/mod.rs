//! CLI module for Relay
//!
//! Command-line interface definitions and handlers for the delegation gateway.
//!
//! # Commands
//!
//! - `serve` - Start the messages API server
//! - `ask` - Answer one message through the full fallback chain
//! - `route` - Show which destination a message would be delegated to
//! - `health` - Check the active provider
//! - `probe` - Probe gateway reachability
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! relay serve
//!
//! # Ask a question as a given caller
//! relay ask "why won't my lifetimes line up?" --caller alice
//!
//! # Generate shell completions
//! relay completions bash > ~/.bash_completion.d/relay
//! ```

pub mod ask;
pub mod completions;
pub mod config;
pub mod health;
pub mod output;
pub mod probe;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::RelayConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Relay - Agent delegation gateway
#[derive(Parser, Debug)]
#[command(
    name = "relay",
    version,
    about = "Routes chat messages to remote specialist agents with graceful fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Relay server
    Serve(ServeArgs),
    /// Answer one message and print the reply
    Ask(AskArgs),
    /// Classify a message and print its destination
    Route(RouteArgs),
    /// Check provider health
    Health(HealthArgs),
    /// Probe gateway reachability
    Probe(ProbeArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "RELAY_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "RELAY_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RELAY_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Message text
    pub message: String,

    /// Caller identifier forwarded to the provider
    #[arg(long, default_value = "relay-cli")]
    pub caller: String,

    /// Persona tone (friendly, professional, neutral)
    #[arg(short, long)]
    pub tone: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Message text
    pub message: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Probe this URL instead of `[gateway].url`
    #[arg(long)]
    pub url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "relay.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load `path` if it exists (defaults otherwise), apply `RELAY_*` overrides
/// and validate.
pub fn load_config(path: &Path) -> Result<RelayConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        RelayConfig::load(Some(path))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        RelayConfig::default()
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
