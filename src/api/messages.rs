//! Messages endpoint handler.

use crate::api::{ApiError, AppState, MessageRequest};
use crate::orchestrator::Reply;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// POST /v1/messages - Answer one chat message.
///
/// Gateway failures never surface here; the orchestrator degrades to a
/// direct answer or an apology, also when the message deadline expires.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<Reply>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "Rejected message body");
        ApiError::invalid_body(&rejection.body_text())
    })?;
    request.validate()?;

    let start_time = std::time::Instant::now();
    let inbound = request.into_inbound(&state.persona);

    let reply = state
        .orchestrator
        .handle_within(&inbound, state.message_deadline)
        .await;

    info!(
        caller_id = %inbound.caller_id,
        route = ?reply.route,
        latency_ms = start_time.elapsed().as_millis() as u64,
        "Message answered"
    );

    Ok(Json(reply))
}
