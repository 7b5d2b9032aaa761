//! # Messages API
//!
//! Mobile-facing HTTP endpoints in front of the delegation orchestrator.
//!
//! ## Endpoints
//!
//! - `POST /v1/messages` - Answer one chat message (delegated, direct or apology)
//! - `GET /health` - Health of the active provider
//!
//! ## Example
//!
//! ```no_run
//! use relay::api::{AppState, create_router};
//! use relay::config::RelayConfig;
//! use relay::logging::TracingSink;
//! use relay::orchestrator::Orchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RelayConfig::load(Some("relay.toml".as_ref()))?;
//! let orchestrator = Orchestrator::from_config(&config, Arc::new(TracingSink))?;
//!
//! let state = Arc::new(AppState::new(Arc::new(orchestrator), Arc::new(config)));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only request validation errors are returned, in OpenAI-compatible format.
//! Malformed JSON bodies are reported the same way:
//! ```json
//! {
//!   "error": {
//!     "message": "'prompt' cannot be empty",
//!     "type": "invalid_request_error",
//!     "param": "prompt",
//!     "code": "invalid_request_error"
//!   }
//! }
//! ```

mod health;
mod messages;
pub mod types;

pub use health::HealthResponse;
pub use types::*;

use crate::config::RelayConfig;
use crate::orchestrator::{Orchestrator, Persona};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<RelayConfig>,
    /// Persona applied when a request carries no overrides
    pub persona: Persona,
    /// Deadline for one message, all fallback tiers included
    pub message_deadline: Duration,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, config: Arc<RelayConfig>) -> Self {
        let persona = Persona::from(&config.persona);
        let message_deadline = Duration::from_secs(config.server.request_timeout_seconds);
        Self {
            orchestrator,
            config,
            persona,
            message_deadline,
            start_time: Instant::now(),
        }
    }
}

/// Create the main API router with all endpoints configured.
///
/// No transport-level timeout is installed: the messages handler enforces
/// `server.request_timeout_seconds` itself and answers with an apology.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/messages", post(messages::handle))
        .route("/health", get(health::handle))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
