//! Request and response types for the messages API.

use crate::orchestrator::{InboundMessage, Persona, Tone};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// Inbound chat message from the mobile client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageRequest {
    pub prompt: String,
    pub caller_id: String,
    /// Overrides `[persona].tone`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Overrides `[persona].preamble`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
}

impl MessageRequest {
    /// Reject blank fields before anything reaches the orchestrator.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.prompt.trim().is_empty() {
            return Err(ApiError::invalid_field("prompt", "'prompt' cannot be empty"));
        }
        if self.caller_id.trim().is_empty() {
            return Err(ApiError::invalid_field(
                "caller_id",
                "'caller_id' cannot be empty",
            ));
        }
        Ok(())
    }

    /// Merge per-request persona overrides over `defaults`.
    pub fn into_inbound(self, defaults: &Persona) -> InboundMessage {
        let persona = Persona {
            tone: self
                .tone
                .as_deref()
                .map(Tone::parse)
                .unwrap_or(defaults.tone),
            preamble: self.preamble.or_else(|| defaults.preamble.clone()),
        };
        InboundMessage::new(self.prompt, self.caller_id, persona)
    }
}

/// OpenAI-compatible error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    /// Create a bad request error (400) naming the offending field.
    pub fn invalid_field(param: &str, message: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.to_string(),
                r#type: "invalid_request_error".to_string(),
                param: Some(param.to_string()),
                code: Some("invalid_request_error".to_string()),
            },
        }
    }

    /// Create a bad request error (400) for a body that is not a valid message.
    pub fn invalid_body(message: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.to_string(),
                r#type: "invalid_request_error".to_string(),
                param: None,
                code: Some("invalid_request_error".to_string()),
            },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.error.code.as_deref() {
            Some("invalid_request_error") => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
